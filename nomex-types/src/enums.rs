use serde::{Deserialize, Serialize};

/// Session status reported by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    #[default]
    Loading,
    Authenticated,
    Unauthenticated,
}

impl AuthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthStatus::Loading => "loading",
            AuthStatus::Authenticated => "authenticated",
            AuthStatus::Unauthenticated => "unauthenticated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "loading" => Some(AuthStatus::Loading),
            "authenticated" => Some(AuthStatus::Authenticated),
            "unauthenticated" => Some(AuthStatus::Unauthenticated),
            _ => None,
        }
    }
}

/// Traveler archetypes users pick during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Persona {
    PassportBro,
    Expat,
    Backpacker,
    DigitalNomad,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::PassportBro => "PASSPORTBRO",
            Persona::Expat => "EXPAT",
            Persona::Backpacker => "BACKPACKER",
            Persona::DigitalNomad => "DIGITALNOMAD",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Persona::PassportBro => "Passport Bro",
            Persona::Expat => "Expat",
            Persona::Backpacker => "Backpacker",
            Persona::DigitalNomad => "Digital Nomad",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PASSPORTBRO" => Some(Persona::PassportBro),
            "EXPAT" => Some(Persona::Expat),
            "BACKPACKER" => Some(Persona::Backpacker),
            "DIGITALNOMAD" => Some(Persona::DigitalNomad),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_status_round_trips_provider_strings() {
        for status in [
            AuthStatus::Loading,
            AuthStatus::Authenticated,
            AuthStatus::Unauthenticated,
        ] {
            assert_eq!(AuthStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AuthStatus::parse("Authenticated"), Some(AuthStatus::Authenticated));
        assert_eq!(AuthStatus::parse("expired"), None);
    }

    #[test]
    fn test_persona_serializes_as_database_tag() {
        let json = serde_json::to_string(&Persona::DigitalNomad).unwrap();
        assert_eq!(json, "\"DIGITALNOMAD\"");
        assert_eq!(Persona::parse("expat"), Some(Persona::Expat));
        assert_eq!(Persona::Backpacker.label(), "Backpacker");
    }
}
