use serde::{Deserialize, Serialize};

/// 未选择分类时的显示名称
pub const ANY_CATEGORY_LABEL: &str = "Any Category";

/// 题目分类
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

/// `api_category.php` 的响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    #[serde(rename = "trivia_categories", default)]
    pub categories: Vec<Category>,
}

/// 获取分类的显示名称，未选择时为 "Any Category"
pub fn category_label(category: Option<&Category>) -> String {
    category
        .map(|c| c.name.clone())
        .unwrap_or_else(|| ANY_CATEGORY_LABEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_response() {
        let json = r#"{"trivia_categories":[{"id":9,"name":"General Knowledge"},{"id":17,"name":"Science & Nature"}]}"#;
        let resp: CategoryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.categories.len(), 2);
        assert_eq!(resp.categories[1].id, 17);
    }

    #[test]
    fn test_category_label() {
        let c = Category {
            id: 9,
            name: "General Knowledge".to_string(),
        };
        assert_eq!(category_label(Some(&c)), "General Knowledge");
        assert_eq!(category_label(None), ANY_CATEGORY_LABEL);
    }
}
