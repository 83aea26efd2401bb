//! Planet payload → [`PlanetRecord`].

use serde::{Deserialize, Serialize};

/// The fields of a solar-system body response this server consumes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetPayload {
    #[serde(default)]
    pub english_name: Option<String>,
    #[serde(default)]
    pub is_planet: Option<bool>,
    #[serde(default)]
    pub gravity: Option<f64>,
    #[serde(default)]
    pub density: Option<f64>,
    // Upstream sends `null` for bodies without satellites.
    #[serde(default)]
    pub moons: Option<Vec<MoonRef>>,
}

/// One entry of the upstream `moons` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MoonRef {
    pub moon: String,
}

/// Stable output schema of the planet tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetRecord {
    pub name: Option<String>,
    pub is_planet: bool,
    pub gravity: Option<f64>,
    pub density: Option<f64>,
    pub moons: Vec<String>,
}

pub fn planet_record(payload: PlanetPayload) -> PlanetRecord {
    PlanetRecord {
        name: payload.english_name,
        is_planet: payload.is_planet.unwrap_or(false),
        gravity: payload.gravity,
        density: payload.density,
        moons: payload
            .moons
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.moon)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_mars() {
        let payload: PlanetPayload = serde_json::from_value(json!({
            "englishName": "Mars",
            "isPlanet": true,
            "gravity": 3.7,
            "density": 3.93,
            "moons": [{ "moon": "Phobos" }, { "moon": "Deimos" }],
        }))
        .unwrap();
        let record = planet_record(payload);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "name": "Mars",
                "is_planet": true,
                "gravity": 3.7,
                "density": 3.93,
                "moons": ["Phobos", "Deimos"],
            })
        );
    }

    #[test]
    fn test_defaults_when_fields_absent() {
        let payload: PlanetPayload = serde_json::from_value(json!({ "englishName": "Pluto" })).unwrap();
        let record = planet_record(payload);
        assert_eq!(record.name.as_deref(), Some("Pluto"));
        assert!(!record.is_planet);
        assert!(record.moons.is_empty());
        assert_eq!(record.gravity, None);
    }

    #[test]
    fn test_null_moons_is_empty() {
        let payload: PlanetPayload =
            serde_json::from_value(json!({ "englishName": "Mercury", "isPlanet": true, "moons": null })).unwrap();
        assert!(planet_record(payload).moons.is_empty());
    }

    #[test]
    fn test_moon_order_is_kept() {
        let payload: PlanetPayload = serde_json::from_value(json!({
            "moons": [{ "moon": "Io", "rel": "x" }, { "moon": "Europa" }, { "moon": "Ganymede" }],
        }))
        .unwrap();
        assert_eq!(planet_record(payload).moons, vec!["Io", "Europa", "Ganymede"]);
    }

    #[test]
    fn test_moon_without_name_is_rejected() {
        let parsed = serde_json::from_value::<PlanetPayload>(json!({ "moons": [{ "rel": "x" }] }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_idempotent() {
        let payload: PlanetPayload =
            serde_json::from_value(json!({ "englishName": "Earth", "isPlanet": true, "moons": [{ "moon": "La Lune" }] }))
                .unwrap();
        assert_eq!(planet_record(payload.clone()), planet_record(payload));
    }
}
