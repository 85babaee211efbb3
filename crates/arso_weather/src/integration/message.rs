//! Messages FROM integrations TO the host

/// Events and state updates reported by an integration
#[derive(Debug, Clone, PartialEq)]
pub enum FromIntegrationMessage {
    /// An entity was discovered and registered
    EntityDiscovered {
        entity_id: String,
        platform: &'static str,
        integration_name: String,
    },

    /// A weather entity finished a poll cycle; `state` is its rendered JSON
    WeatherUpdated {
        entity_id: String,
        state: serde_json::Value,
    },
}

impl FromIntegrationMessage {
    pub fn entity_id(&self) -> &str {
        match self {
            FromIntegrationMessage::EntityDiscovered { entity_id, .. } => entity_id,
            FromIntegrationMessage::WeatherUpdated { entity_id, .. } => entity_id,
        }
    }
}
