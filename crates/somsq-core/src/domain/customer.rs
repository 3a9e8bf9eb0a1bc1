/// A matched customer as reported by the lookup endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerRecord {
    pub id: Option<String>,
    pub full_name: Option<String>,
}

impl CustomerRecord {
    pub fn new<'a>(id: Option<&str>, name_parts: impl IntoIterator<Item = &'a str>) -> Self {
        let id = id.map(collapse_whitespace).filter(|id| !id.is_empty());
        Self {
            id,
            full_name: build_full_name(name_parts),
        }
    }

    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    pub fn has_full_name(&self) -> bool {
        self.full_name.is_some()
    }
}

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Joins given names and surnames in order, dropping blank parts.
pub fn build_full_name<'a>(parts: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let parts: Vec<String> = parts
        .into_iter()
        .map(collapse_whitespace)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join(" "))
}
