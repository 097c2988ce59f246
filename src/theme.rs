use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub male_fill: String,
    pub female_fill: String,
    pub node_border_color: String,
    pub primary_border_color: String,
    pub text_color: String,
    pub age_text_color: String,
    pub child_line_color: String,
    pub spouse_line_color: String,
    pub former_spouse_line_color: String,
    pub date_text_color: String,
    pub group_indicator_color: String,
}

impl Theme {
    /// Pastel palette close to the classic desktop genealogy look.
    pub fn classic() -> Self {
        Self {
            font_family: "\"segoe ui\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            background: "#FFFFFF".to_string(),
            male_fill: "#D3E4F4".to_string(),
            female_fill: "#F4D9DE".to_string(),
            node_border_color: "#9AA8B8".to_string(),
            primary_border_color: "#5B7FA6".to_string(),
            text_color: "#2B2B2B".to_string(),
            age_text_color: "#6B6B6B".to_string(),
            child_line_color: "#A0A8B0".to_string(),
            spouse_line_color: "#C9A227".to_string(),
            former_spouse_line_color: "#B8B8B8".to_string(),
            date_text_color: "#8A8A8A".to_string(),
            group_indicator_color: "#5B7FA6".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            background: "#FFFFFF".to_string(),
            male_fill: "#E3F2FD".to_string(),
            female_fill: "#FCE4EC".to_string(),
            node_border_color: "#C7D2E5".to_string(),
            primary_border_color: "#4A6FA5".to_string(),
            text_color: "#1C2430".to_string(),
            age_text_color: "#7A8AA6".to_string(),
            child_line_color: "#AAB4C4".to_string(),
            spouse_line_color: "#D4A72C".to_string(),
            former_spouse_line_color: "#C4C9D2".to_string(),
            date_text_color: "#8D99AE".to_string(),
            group_indicator_color: "#4A6FA5".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
