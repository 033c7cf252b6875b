use arrakis_rs::prelude::*;

const OVERRIDES: &str = r#"
raw_files = ["INTRO.VOC"]

[[animations]]
file = "SHAI2.HSQ"
dialect = "generic"

[[animations]]
file = "MIRROR.HSQ"
dialect = "segmented"
limits = [5, 11]
"#;

fn load(text: &str) -> AssetConfig {
	config::Config::builder()
		.add_source(config::File::from_str(text, config::FileFormat::Toml))
		.build()
		.unwrap()
		.try_deserialize()
		.unwrap()
}

#[test_log::test]
fn toml_overrides_merge_over_builtin_table() {
	let config = AssetConfig::default().merged(load(OVERRIDES));

	assert_eq!(config.load_mode("sound/intro.voc"), LoadMode::Raw);
	assert_eq!(config.load_mode("VOICE.HSQ"), LoadMode::Auto);
	assert_eq!(config.dialect("SHAI2.HSQ"), AnimationDialect::Generic);
	assert_eq!(
		config.dialect("data/mirror.hsq"),
		AnimationDialect::Segmented {
			limits: vec![5, 11],
		}
	);
}

#[test_log::test]
fn empty_document_keeps_defaults() {
	let config = AssetConfig::default().merged(load(""));
	assert_eq!(config, AssetConfig::default());
	assert_eq!(config.dialect("shai2.hsq"), AnimationDialect::Swap);
}

#[test_log::test]
fn json_round_trip() {
	let json = serde_json::to_string(&AssetConfig::default()).unwrap();
	assert!(json.contains(r#""dialect":"swap""#));
	let parsed: AssetConfig = serde_json::from_str(&json).unwrap();
	assert_eq!(parsed, AssetConfig::default());
}
