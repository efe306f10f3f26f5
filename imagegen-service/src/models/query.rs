use serde::Deserialize;

/// Query parameters accepted by the generate endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateQuery {
    /// Text describing the desired image. Required and non-empty.
    pub prompt: Option<String>,

    /// One of the recognised model identifiers. Defaults to the speed model.
    pub model: Option<String>,
}

/// Builds from raw query pairs. A repeated key keeps its first value.
impl FromIterator<(String, String)> for GenerateQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = GenerateQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "prompt" => &mut query.prompt,
                "model" => &mut query.model,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

impl GenerateQuery {
    /// The prompt, if present and non-empty.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }

    /// The requested model identifier, treating an empty value as absent.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.is_empty())
    }
}
