//! Domain-level command and query types
//! These structs are used by services inside the domain layer; the story
//! generation pipeline maps its own request types onto them.

pub mod themes {
    /// Query asking whether the next story for a kid should carry a theme.
    #[derive(Debug, Clone)]
    pub struct ThemeDecisionQuery {
        pub kid_profile_id: String,
        /// Language the story will be generated in (label resolution)
        pub story_language: String,
    }
}

pub mod subtypes {
    use shared::ThemeCategory;

    /// Query asking for the narrative subtype of the next story.
    #[derive(Debug, Clone)]
    pub struct SubtypeQuery {
        /// Theme identifier or category wire form; unmapped keys fall back
        /// to the surprise category
        pub theme: String,
        /// Absent for anonymous/guest usage; selection then runs without
        /// recency exclusion
        pub kid_profile_id: Option<String>,
        pub age: u8,
        /// Language the story will be generated in (label resolution)
        pub language: String,
    }

    /// Usage report appended after a story was generated with a subtype.
    #[derive(Debug, Clone)]
    pub struct SubtypeUsage {
        pub kid_profile_id: Option<String>,
        pub category: ThemeCategory,
        pub subtype_key: String,
        pub story_id: Option<String>,
    }
}
