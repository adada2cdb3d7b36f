use crate::api::{PokemonPayload, SpeciesPayload};
use crate::error::{IngestError, Result};

/// Gender split of a species
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gender {
    Genderless,
    Ratio { male: f64, female: f64 },
}

impl Gender {
    /// Convert a gender rate (eighths female, -1 for genderless)
    pub fn from_rate(rate: i64) -> Result<Self> {
        match rate {
            -1 => Ok(Gender::Genderless),
            0..=8 => {
                let female = rate as f64 * 12.5;
                Ok(Gender::Ratio {
                    male: 100.0 - female,
                    female,
                })
            }
            other => Err(IngestError::InvalidField {
                field: "gender_rate",
                reason: format!("{} is outside -1..=8", other),
            }),
        }
    }

    /// The (male, female) column pair, both `None` when genderless
    pub fn percentages(&self) -> (Option<f64>, Option<f64>) {
        match *self {
            Gender::Genderless => (None, None),
            Gender::Ratio { male, female } => (Some(male), Some(female)),
        }
    }

    /// Rebuild from stored columns; a half-populated pair reads as genderless
    pub fn from_percentages(male: Option<f64>, female: Option<f64>) -> Self {
        match (male, female) {
            (Some(male), Some(female)) => Gender::Ratio { male, female },
            _ => Gender::Genderless,
        }
    }
}

/// One named base stat
#[derive(Debug, Clone, PartialEq)]
pub struct StatValue {
    pub name: String,
    pub value: i64,
}

/// A creature reduced to the fields that are stored
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureRecord {
    pub id: i64,
    pub name: String,
    pub height: i64,
    pub weight: i64,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<StatValue>,
    pub held_items: Vec<String>,
    pub gender: Gender,
}

/// Combine the creature and species payloads into a record
pub fn parse_record(pokemon: &PokemonPayload, species: &SpeciesPayload) -> Result<CreatureRecord> {
    if pokemon.name.trim().is_empty() {
        return Err(IngestError::InvalidField {
            field: "name",
            reason: format!("pokemon {} has an empty name", pokemon.id),
        });
    }

    Ok(CreatureRecord {
        id: pokemon.id,
        name: pokemon.name.clone(),
        height: pokemon.height,
        weight: pokemon.weight,
        types: pokemon.types.iter().map(|t| t.kind.name.clone()).collect(),
        abilities: pokemon
            .abilities
            .iter()
            .map(|a| a.ability.name.clone())
            .collect(),
        stats: pokemon
            .stats
            .iter()
            .map(|s| StatValue {
                name: s.stat.name.clone(),
                value: s.base_stat,
            })
            .collect(),
        held_items: pokemon
            .held_items
            .iter()
            .map(|h| h.item.name.clone())
            .collect(),
        gender: Gender::from_rate(species.gender_rate)?,
    })
}

/// Upper-case the first letter of a stored name
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiResource;

    fn species(rate: i64) -> SpeciesPayload {
        SpeciesPayload {
            gender_rate: rate,
            evolution_chain: ApiResource {
                url: "chain".to_string(),
            },
        }
    }

    #[test]
    fn test_gender_rates() {
        assert_eq!(Gender::from_rate(-1).unwrap(), Gender::Genderless);
        assert_eq!(
            Gender::from_rate(0).unwrap(),
            Gender::Ratio { male: 100.0, female: 0.0 }
        );
        assert_eq!(
            Gender::from_rate(2).unwrap(),
            Gender::Ratio { male: 75.0, female: 25.0 }
        );
        assert_eq!(
            Gender::from_rate(4).unwrap(),
            Gender::Ratio { male: 50.0, female: 50.0 }
        );
        assert_eq!(
            Gender::from_rate(8).unwrap(),
            Gender::Ratio { male: 0.0, female: 100.0 }
        );
    }

    #[test]
    fn test_gender_ratio_is_complementary() {
        for rate in 0..=8 {
            let (male, female) = Gender::from_rate(rate).unwrap().percentages();
            assert_eq!(male.unwrap() + female.unwrap(), 100.0);
        }
        assert_eq!(Gender::Genderless.percentages(), (None, None));
    }

    #[test]
    fn test_gender_rate_out_of_range() {
        assert!(matches!(
            Gender::from_rate(9),
            Err(IngestError::InvalidField { field: "gender_rate", .. })
        ));
        assert!(Gender::from_rate(-2).is_err());
    }

    #[test]
    fn test_parse_record_flattens_tags() {
        let json = r#"{
            "id": 1, "name": "bulbasaur", "height": 7, "weight": 69,
            "types": [{"type": {"name": "grass"}}, {"type": {"name": "poison"}}],
            "abilities": [{"ability": {"name": "overgrow"}}],
            "stats": [{"base_stat": 45, "stat": {"name": "hp"}}],
            "species": {"name": "bulbasaur", "url": "s"}
        }"#;
        let pokemon: PokemonPayload = serde_json::from_str(json).unwrap();
        let record = parse_record(&pokemon, &species(1)).unwrap();

        assert_eq!(record.types, vec!["grass", "poison"]);
        assert_eq!(record.abilities, vec!["overgrow"]);
        assert_eq!(
            record.stats,
            vec![StatValue { name: "hp".to_string(), value: 45 }]
        );
        assert!(record.held_items.is_empty());
        assert_eq!(record.gender, Gender::Ratio { male: 87.5, female: 12.5 });
    }

    #[test]
    fn test_parse_record_rejects_empty_name() {
        let pokemon = PokemonPayload {
            id: 3,
            name: " ".to_string(),
            height: 1,
            weight: 1,
            types: vec![],
            abilities: vec![],
            stats: vec![],
            held_items: vec![],
            species: ApiResource {
                url: String::new(),
            },
        };
        assert!(parse_record(&pokemon, &species(-1)).is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("bulbasaur"), "Bulbasaur");
        assert_eq!(display_name("mr-mime"), "Mr-mime");
        assert_eq!(display_name(""), "");
    }
}
