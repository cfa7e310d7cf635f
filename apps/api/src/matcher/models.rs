use serde::Serialize;

/// Structured outcome of one match request. Serialised as the success body of
/// `POST /api/matcher/match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// 0 – 100, as reported by the model.
    pub match_percentage: u32,
    /// At most three, in the order the model gave them.
    pub top_tips: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_result_serializes_camel_case() {
        let result = MatchResult {
            match_percentage: 64,
            top_tips: vec!["Add a skills section".to_string()],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["matchPercentage"], 64);
        assert_eq!(value["topTips"][0], "Add a skills section");
        assert!(value.get("match_percentage").is_none());
    }
}
