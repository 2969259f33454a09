//! Instruction prompts for the language model
//!
//! Every prompt asks for exactly one JSON object in a fixed shape; the
//! corresponding serde structs live next to the code that parses them.

/// Classification prompt enumerating the known intents
pub fn classification(utterance: &str) -> String {
    format!(
        r#"You are a task classifier for a video assistant app.
Analyze the user's message and classify it into one of these 4 categories:

1. "make_playlist" - User wants to create a new playlist.
2. "remove_playlist" - User wants to delete/remove a playlist.
3. "manage_playlist" - User wants to modify an existing playlist.
4. "play_video" - User wants to watch or listen to something now.

User message: "{utterance}"

Respond ONLY with a JSON object in this exact format:
{{
  "action": "make_playlist|remove_playlist|manage_playlist|play_video",
  "confidence": 0.95,
  "reasoning": "Brief explanation of why you chose this classification."
}}
"#
    )
}

/// Parameter extraction for playlist creation
pub fn make_playlist(utterance: &str) -> String {
    format!(
        r#"You are a playlist creation assistant. Your job is to extract structured parameters from the user's request. If a parameter cannot be confidently determined, return null.

Parameters to extract:
- playlist_name: A suitable name for the playlist, or null.
- content_type: One of [music, education, podcast, entertainment, information, comedy], or null if not inferable.
- content_creator: The main creator that the user mentioned, if any (e.g., artist, teacher, streamer, celebrity), or null.
- description: A short natural-language description of the playlist (max 30 words), or null.
- privacy: "public" or "private". Default to "private" if not specified.
- vid_count: An integer. If the user specifies a number, use it. If they use vague terms ("few", "many"), interpret reasonably (e.g., few=5, several=10, a lot=20). Set null only and only if a roadmap is needed. Default = 15
- need_roadmap: answer in yes or no if the requirement of the user needs a roadmap in order to make a playlist (e.g. to learn a topic, we need a roadmap)

Decision:
- ready_to_execute: true if enough information is present to reasonably create a playlist (at least playlist_name OR description, and content_type), else false.

User message: """{utterance}"""

Respond ONLY with valid JSON in the following format (no extra text, no explanation):
{{
  "parameters": {{
    "playlist_name": "string or null",
    "content_type": "string or null",
    "content_creator": "string or null",
    "description": "string or null",
    "privacy": "public" or "private",
    "vid_count": "number or null",
    "need_roadmap": "yes" or "no"
  }},
  "ready_to_execute": true or false
}}
"#
    )
}

/// Playlist selection for deletion, constrained to the caller's playlists
pub fn remove_playlist(utterance: &str, playlists_json: &str) -> String {
    format!(
        r#"You are an intelligent playlist deletion assistant. Your job is to accurately identify which of the user's playlists they want to delete based on their message and a provided list.

CONTEXT:
The user has the following playlists. Your decision MUST be one of these playlists.
Playlists List:
{playlists_json}

USER MESSAGE:
"""{utterance}"""

YOUR TASK:
1. Analyze the user's message and identify the single playlist they want to delete from the 'Playlists List'.
2. If you can confidently identify a playlist, extract its "id" and "name".
3. If the request is ambiguous or you cannot find a match, return null for the playlist.

DECISION:
- ready_to_execute: Set to true ONLY if you successfully identified a playlist to delete, otherwise false.

Respond ONLY with valid JSON in the following format:
{{
  "parameters": {{
    "playlist_to_delete": {{ "id": "string, from the list provided", "name": "string, from the list provided" }} or null
  }},
  "ready_to_execute": true or false
}}
"#
    )
}

/// Stage one of playlist management: identify the target and the operation
pub fn manage_triage(utterance: &str, playlists_json: &str) -> String {
    format!(
        r#"You are a playlist management assistant. Identify which of the user's playlists they want to modify and what kind of modification they want.

CONTEXT:
The user has the following playlists. The target MUST be one of these playlists.
Playlists List:
{playlists_json}

USER MESSAGE:
"""{utterance}"""

YOUR TASK:
1. Identify the single playlist the user wants to modify; extract its "id" and "name". If ambiguous or no match, return null.
2. Identify the management action: "add_videos" (add new content), "remove_videos" (remove existing content), or "rename_playlist" (change the title). If unclear, return null.

Respond ONLY with valid JSON in the following format:
{{
  "playlist": {{ "id": "string, from the list provided", "name": "string, from the list provided" }} or null,
  "action": "add_videos" or "remove_videos" or "rename_playlist" or null
}}
"#
    )
}

/// Stage two of playlist management: parameters for adding videos
pub fn manage_add_videos(utterance: &str) -> String {
    format!(
        r#"You are a playlist management assistant. The user wants to add videos to one of their playlists. Derive the search parameters for the new content.

Parameters to extract:
- search_query: A single effective search query for the content to add, or null if it cannot be determined.
- video_count: An integer number of videos to add. If the user specifies a number, use it. If they use vague terms, interpret reasonably (few=5, several=10, a lot=20). Default = 5.

USER MESSAGE:
"""{utterance}"""

Respond ONLY with valid JSON in the following format:
{{
  "search_query": "string or null",
  "video_count": 5
}}
"#
    )
}

/// Stage two of playlist management: which existing items to remove
pub fn manage_remove_videos(utterance: &str, items_json: &str) -> String {
    format!(
        r#"You are a playlist management assistant. The user wants to remove videos from one of their playlists. Match their description against the playlist's current items.

CONTEXT:
The playlist currently contains the following videos. Your selection MUST come from this list.
Playlist Items:
{items_json}

USER MESSAGE:
"""{utterance}"""

YOUR TASK:
Identify every video the user wants removed and collect its "video_id". If nothing matches, return an empty array.

Respond ONLY with valid JSON in the following format:
{{
  "video_ids": ["video id from the list", "..."]
}}
"#
    )
}

/// Stage two of playlist management: the new title
pub fn manage_rename(utterance: &str) -> String {
    format!(
        r#"You are a playlist management assistant. The user wants to rename one of their playlists. Extract the new title from their message.

USER MESSAGE:
"""{utterance}"""

Respond ONLY with valid JSON in the following format:
{{
  "new_name": "string or null"
}}
"#
    )
}

/// Parameter extraction for immediate playback
pub fn play_video(utterance: &str) -> String {
    format!(
        r#"You are an expert at understanding user requests to watch videos. Your job is to extract raw, structured search parameters from the user's message. Do NOT create the final search query yourself.

Parameters to extract:
- topic: The main subject or title of the video (e.g., "latest phone review", "how to cook pasta").
- creator: The specific channel or creator mentioned, or null.
- genre: The genre of music or content if specified (e.g., "lofi", "jazz", "comedy special"), or null.
- video_length: Infer the desired video length. Can be "short" (under 4 min), "medium" (4-20 min), or "long" (over 20 min). Default to "any".

Decision:
- ready_to_execute: true if you can extract at least a 'topic', 'creator', or 'genre'.

User message: """{utterance}"""

Respond ONLY with valid JSON in the following format:
{{
  "parameters": {{
    "topic": "string or null",
    "creator": "string or null",
    "genre": "string or null",
    "video_length": "short" or "medium" or "long" or "any"
  }},
  "ready_to_execute": true or false
}}
"#
    )
}

/// Single best search query for a non-roadmap playlist
pub fn playlist_query(content_type: &str, content_creator: &str, description: &str) -> String {
    format!(
        r#"You are a video search query expert. Your task is to generate the single best search query to find a variety of videos for a playlist based on the following parameters.

Playlist Parameters:
- Content Type: "{content_type}"
- Creator / Artist: "{content_creator}"
- Description: "{description}"

Instructions:
1. Analyze the parameters to create one single, effective search query.
2. The query should be broad enough to find multiple relevant videos but specific enough to be accurate. For music, focus on the artist and genre. For topics, focus on the core subject.
3. Respond ONLY with a valid JSON object with a single key named "query".

Example Response Format:
{{"query": "best search query goes here"}}
"#
    )
}

/// Search query synthesis for immediate playback
pub fn play_query(topic: &str, creator: &str, genre: &str) -> String {
    format!(
        r#"You are a video search query synthesis expert. Your task is to take structured parameters and create the single best search query to find relevant videos.

Structured Parameters:
- Topic: "{topic}"
- Creator/Channel: "{creator}"
- Genre: "{genre}"

Instructions:
1. Combine the provided parameters into a single, effective search query.
2. Prioritize the most specific information. If a creator is mentioned, they should be prominent in the query.
3. If the parameters are vague, create a broader, more general query.
4. Respond ONLY with a valid JSON object with a single key named "query".

Example Input: {{ "topic": "new song", "creator": "Tame Impala" }}
Example Response: {{"query": "Tame Impala new song"}}

Example Input: {{ "genre": "80s rock music" }}
Example Response: {{"query": "best 80s rock music"}}
"#
    )
}

/// Learning roadmap with one search query per step
pub fn roadmap(topic: &str, description: &str) -> String {
    format!(
        r#"You are an expert curriculum and content strategist. Your task is to create a step-by-step learning roadmap for the given topic. For each step, you must also generate a concise, high-quality video search query that would find a good introductory video for that step.

Playlist Parameters:
- Topic / Name: "{topic}"
- Description: "{description}"

Instructions:
1. Create a logical, step-by-step learning roadmap.
2. The number of steps should be comprehensive yet concise, covering the essential stages of learning the topic. A reasonable number is typically between 5 and 15 steps, but use your expert judgment.
3. For each step, provide a clear "title" and a specific video search "query".
4. The "query" should be optimized to find the best possible educational video for that step.
5. Respond ONLY with a valid JSON object in the specified format.

Example Response Format:
{{
  "roadmap": [
    {{ "step": 1, "title": "Introduction to Quantum Physics", "query": "quantum physics for beginners simplified" }},
    {{ "step": 2, "title": "Wave-Particle Duality", "query": "wave-particle duality explained double slit experiment" }}
  ]
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_embeds_utterance() {
        let prompt = classification("play some jazz");
        assert!(prompt.contains("play some jazz"));
        assert!(prompt.contains("make_playlist"));
        assert!(prompt.contains("play_video"));
    }

    #[test]
    fn test_remove_playlist_embeds_list() {
        let prompt = remove_playlist("delete my gym mix", r#"[{"id":"PL1","name":"Gym Mix"}]"#);
        assert!(prompt.contains("Gym Mix"));
        assert!(prompt.contains("delete my gym mix"));
    }

    #[test]
    fn test_prompts_are_brace_balanced_json_examples() {
        // Each prompt shows a JSON example; a stray unescaped brace in the
        // format string would corrupt it.
        for prompt in [
            classification("x"),
            make_playlist("x"),
            manage_triage("x", "[]"),
            manage_add_videos("x"),
            manage_remove_videos("x", "[]"),
            manage_rename("x"),
            play_video("x"),
            playlist_query("a", "b", "c"),
            play_query("a", "b", "c"),
            roadmap("a", "b"),
        ] {
            let opens = prompt.matches('{').count();
            let closes = prompt.matches('}').count();
            assert_eq!(opens, closes, "unbalanced braces in prompt:\n{prompt}");
        }
    }
}
