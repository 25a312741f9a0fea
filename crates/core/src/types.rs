use serde::{Deserialize, Serialize};

/// Generation timestamps are recorded in local time, like the filenames.
pub type Timestamp = chrono::DateTime<chrono::Local>;

/// One image returned by a generation, plus where it was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// 1-based position within the generation.
    pub index: u32,
    /// Prompt the provider actually used (the original prompt if none was returned).
    pub revised_prompt: String,
    /// Provider URL, or the local `/images/...` URL once saved.
    pub url: Option<String>,
    pub b64_json: Option<String>,
    pub saved_path: Option<String>,
}

/// Outcome of a single generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub original_prompt: String,
    pub count: usize,
    pub images: Vec<GeneratedImage>,
    pub timestamp: Timestamp,
}

impl GenerationResult {
    /// A failed generation with no images.
    pub fn failure(prompt: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            original_prompt: prompt.into(),
            count: 0,
            images: Vec::new(),
            timestamp: chrono::Local::now(),
        }
    }

    /// A successful generation; `count` follows the number of images.
    pub fn success(prompt: impl Into<String>, images: Vec<GeneratedImage>) -> Self {
        Self {
            success: true,
            error: None,
            original_prompt: prompt.into(),
            count: images.len(),
            images,
            timestamp: chrono::Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_serializes_error_and_zero_count() {
        let result = GenerationResult::failure("a fox", "boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert_eq!(json["count"], 0);
        assert_eq!(json["original_prompt"], "a fox");
        assert!(json["images"].as_array().unwrap().is_empty());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn success_omits_error_field() {
        let result = GenerationResult::success("a fox", Vec::new());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
    }
}
