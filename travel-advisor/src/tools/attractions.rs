use super::{ToolOutcome, places::resolve_city};
use adk_core::{AdkError, Result, Tool, ToolContext};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub name: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionList {
    pub location: String,
    pub attractions: Vec<Attraction>,
    pub report: String,
}

const ATTRACTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Seoul",
        &[
            ("Gyeongbokgung Palace", "Joseon-era royal palace with a changing of the guard"),
            ("Bukchon Hanok Village", "Traditional houses between two palaces"),
            ("N Seoul Tower", "City views from Namsan mountain"),
        ],
    ),
    (
        "Tokyo",
        &[
            ("Senso-ji", "Tokyo's oldest temple in Asakusa"),
            ("Meiji Jingu", "Forested shrine next to Harajuku"),
            ("Shibuya Crossing", "The famous scramble intersection"),
        ],
    ),
    (
        "Vientiane",
        &[
            ("Pha That Luang", "Gold-covered stupa and national symbol of Laos"),
            ("Patuxai", "Victory monument with a rooftop view"),
            ("Buddha Park", "Riverside park filled with concrete sculptures"),
        ],
    ),
    (
        "Luang Prabang",
        &[
            ("Kuang Si Falls", "Turquoise tiered waterfalls south of town"),
            ("Wat Xieng Thong", "Classic Lao temple architecture on the Mekong"),
            ("Mount Phousi", "Sunset viewpoint above the night market"),
        ],
    ),
    (
        "Bangkok",
        &[
            ("Grand Palace", "Former royal residence and Wat Phra Kaew"),
            ("Wat Arun", "Temple of Dawn on the Chao Phraya river"),
            ("Chatuchak Weekend Market", "Thousands of stalls open on weekends"),
        ],
    ),
    (
        "Paris",
        &[
            ("Eiffel Tower", "Iron landmark on the Champ de Mars"),
            ("Louvre Museum", "Home of the Mona Lisa"),
            ("Montmartre", "Hilltop artists' quarter around Sacré-Cœur"),
        ],
    ),
    (
        "London",
        &[
            ("British Museum", "World history and culture, free entry"),
            ("Tower of London", "Medieval fortress and the Crown Jewels"),
            ("Borough Market", "Food market near London Bridge"),
        ],
    ),
    (
        "New York",
        &[
            ("Central Park", "843 acres of green space in Manhattan"),
            ("Metropolitan Museum of Art", "Encyclopedic art museum on Fifth Avenue"),
            ("Brooklyn Bridge", "Walkable suspension bridge with skyline views"),
        ],
    ),
];

/// Lists popular (mock) attractions for a location.
pub fn get_local_attractions(location: &str) -> ToolOutcome<AttractionList> {
    if location.trim().is_empty() {
        return ToolOutcome::error("The 'location' parameter must not be empty.");
    }

    let found = resolve_city(location)
        .and_then(|city| ATTRACTIONS.iter().find(|(name, _)| *name == city));

    match found {
        Some((city, entries)) => {
            let attractions: Vec<Attraction> = entries
                .iter()
                .map(|(name, note)| Attraction { name: name.to_string(), note: note.to_string() })
                .collect();
            let names = attractions.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ");
            ToolOutcome::success(AttractionList {
                location: city.to_string(),
                report: format!("Top attractions in {city}: {names}."),
                attractions,
            })
        }
        None => ToolOutcome::not_found(format!(
            "No attraction information is available for '{}'.",
            location.trim()
        )),
    }
}

#[derive(Debug, Deserialize)]
struct AttractionParams {
    location: String,
}

/// `get_local_attractions` as an agent tool.
pub struct LocalAttractionsTool;

#[async_trait]
impl Tool for LocalAttractionsTool {
    fn name(&self) -> &str {
        "get_local_attractions"
    }

    fn description(&self) -> &str {
        "Lists popular tourist attractions for a city or country. \
         Returns status 'success' with a list of attractions, \
         or status 'not_found' when the location is unknown."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City or country name, e.g. 'Luang Prabang'"
                }
            },
            "required": ["location"]
        }))
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let params: AttractionParams = serde_json::from_value(args).map_err(|e| {
            AdkError::Tool(format!("get_local_attractions: invalid arguments: {e}"))
        })?;
        let outcome = get_local_attractions(&params.location);
        tracing::debug!(tool = "get_local_attractions", location = %params.location, status = outcome.status.as_str(), "tool executed");
        serde_json::to_value(outcome).map_err(|e| AdkError::Tool(e.to_string()))
    }
}
