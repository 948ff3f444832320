use crate::dedup::Record;
use crate::image_reference::{extract_digest, extract_tag, remove_tag};
use serde_json::Value;

/// Image and image ID as reported by a container status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerImage {
    pub image: String,
    pub image_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerImageRecord {
    pub image: String,
    pub digest: Option<String>,
    pub tag: Option<String>,
}

impl From<&ContainerImage> for ContainerImageRecord {
    fn from(container_image: &ContainerImage) -> Self {
        Self {
            image: remove_tag(&container_image.image).to_string(),
            digest: extract_digest(&container_image.image_id).map(str::to_string),
            tag: extract_tag(&container_image.image).map(str::to_string),
        }
    }
}

impl Record for ContainerImageRecord {
    fn field(&self, name: &str) -> Option<Value> {
        let optional = |value: &Option<String>| value.clone().map_or(Value::Null, Value::String);
        match name {
            "image" => Some(Value::String(self.image.clone())),
            "digest" => Some(optional(&self.digest)),
            "tag" => Some(optional(&self.tag)),
            _ => None,
        }
    }

    fn is_empty(&self) -> bool {
        false
    }
}
