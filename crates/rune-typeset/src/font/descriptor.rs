//! Validation of persisted family descriptors.

use rune_config::{FaceConfig, FamilyConfig};

use crate::error::RegistrationError;
use crate::font::registry::{FaceInfo, FamilyInfo};
use crate::font::script::{ScriptSet, parse_script};
use crate::font::{FontStyle, FontWeight};

impl TryFrom<&FaceConfig> for FaceInfo {
    type Error = RegistrationError;

    fn try_from(config: &FaceConfig) -> Result<Self, Self::Error> {
        let weight = FontWeight::from_value(config.weight).ok_or_else(|| {
            RegistrationError::InvalidConfiguration(format!(
                "face `{}` has unsupported weight {}",
                config.name, config.weight
            ))
        })?;
        let style = FontStyle::parse(&config.style).ok_or_else(|| {
            RegistrationError::InvalidConfiguration(format!(
                "face `{}` has unknown style `{}`",
                config.name, config.style
            ))
        })?;
        if config.uri.is_empty() {
            return Err(RegistrationError::InvalidConfiguration(format!(
                "face `{}` has no uri",
                config.name
            )));
        }
        Ok(FaceInfo {
            name: config.name.clone(),
            uri: config.uri.clone(),
            index: config.index,
            weight,
            style,
        })
    }
}

impl TryFrom<&FamilyConfig> for FamilyInfo {
    type Error = RegistrationError;

    fn try_from(config: &FamilyConfig) -> Result<Self, Self::Error> {
        if config.name.trim().is_empty() {
            return Err(RegistrationError::InvalidConfiguration(
                "family without a name".to_string(),
            ));
        }
        let mut scripts = ScriptSet::all();
        for name in &config.scripts {
            let script = parse_script(name).ok_or_else(|| {
                RegistrationError::InvalidConfiguration(format!(
                    "family `{}` declares unknown script `{name}`",
                    config.name
                ))
            })?;
            scripts.insert(script);
        }
        let faces = config
            .faces
            .iter()
            .map(FaceInfo::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FamilyInfo {
            name: config.name.clone(),
            scripts,
            linked: config.linked.clone(),
            fallbacks: config.fallbacks.clone(),
            faces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::script::Script;

    fn face(weight: u16, style: &str) -> FaceConfig {
        FaceConfig {
            name: "face".into(),
            uri: "face.ttf".into(),
            weight,
            style: style.into(),
            ..FaceConfig::default()
        }
    }

    #[test]
    fn converts_valid_descriptor() {
        let config = FamilyConfig {
            name: "Sans".into(),
            scripts: vec!["Latn".into(), "cyrillic".into()],
            linked: vec!["Arabic Sans".into()],
            faces: vec![face(700, "Italic")],
            ..FamilyConfig::default()
        };
        let info = FamilyInfo::try_from(&config).unwrap();
        assert!(info.scripts.contains(Script::Latin));
        assert!(info.scripts.contains(Script::Cyrillic));
        assert!(!info.scripts.contains(Script::Arabic));
        assert_eq!(info.faces[0].weight, FontWeight::Bold);
        assert_eq!(info.faces[0].style, FontStyle::Italic);
        assert_eq!(info.linked, vec!["Arabic Sans".to_string()]);
    }

    #[test]
    fn rejects_bad_weight_style_and_script() {
        let mut config = FamilyConfig {
            name: "Sans".into(),
            faces: vec![face(450, "normal")],
            ..FamilyConfig::default()
        };
        assert!(matches!(
            FamilyInfo::try_from(&config),
            Err(RegistrationError::InvalidConfiguration(_))
        ));

        config.faces = vec![face(400, "slanted")];
        assert!(FamilyInfo::try_from(&config).is_err());

        config.faces = vec![face(400, "normal")];
        config.scripts = vec!["Klingon".into()];
        assert!(FamilyInfo::try_from(&config).is_err());
    }

    #[test]
    fn empty_face_list_converts_and_fails_at_registration() {
        let config = FamilyConfig {
            name: "Empty".into(),
            ..FamilyConfig::default()
        };
        let info = FamilyInfo::try_from(&config).unwrap();
        assert!(info.faces.is_empty());
    }
}
