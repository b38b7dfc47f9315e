use super::*;

fn names(chain: &[ProviderSpec]) -> Vec<&str> {
    chain.iter().map(|s| s.name.as_str()).collect()
}

#[test]
fn standard_chains_are_ordered_primary_first() {
    let settings = CatalogSettings { google_cse_id: Some("cx-1".into()), ..CatalogSettings::default() };
    let chains = ProviderChains::standard(&settings).unwrap();

    assert_eq!(names(chains.chain_for(Capability::Chat, SearchMode::Web)), ["groq", "hugging-face"]);
    assert_eq!(names(chains.chain_for(Capability::Image, SearchMode::Web)), ["flux", "stability-sdxl"]);
    assert_eq!(names(chains.chain_for(Capability::Search, SearchMode::Research)), ["exa", "google-cse"]);
    assert_eq!(names(chains.chain_for(Capability::Search, SearchMode::Web)), ["serper", "google-cse"]);
}

#[test]
fn standard_catalog_passes_shape_validation() {
    assert!(ProviderChains::standard(&CatalogSettings::default()).is_ok());
    let with_cse = CatalogSettings { google_cse_id: Some("cx".into()), ..CatalogSettings::default() };
    assert!(ProviderChains::standard(&with_cse).is_ok());
}

#[test]
fn research_and_web_chains_differ() {
    let chains = ProviderChains::standard(&CatalogSettings::default()).unwrap();
    let research = chains.chain_for(Capability::Search, SearchMode::Research);
    let web = chains.chain_for(Capability::Search, SearchMode::Web);
    assert_ne!(research[0].name, web[0].name);
}

#[test]
fn google_cse_omitted_without_engine_id() {
    let chains = ProviderChains::standard(&CatalogSettings::default()).unwrap();
    assert_eq!(names(chains.chain_for(Capability::Search, SearchMode::Research)), ["exa"]);
    assert_eq!(names(chains.chain_for(Capability::Search, SearchMode::Web)), ["serper"]);
}

#[test]
fn search_mode_ignored_for_chat_and_image() {
    let chains = ProviderChains::standard(&CatalogSettings::default()).unwrap();
    assert_eq!(
        chains.chain_for(Capability::Chat, SearchMode::Research),
        chains.chain_for(Capability::Chat, SearchMode::Web)
    );
}

#[test]
fn groq_uses_configured_model() {
    let settings = CatalogSettings { groq_model: "mixtral-8x7b".into(), google_cse_id: None };
    let chains = ProviderChains::standard(&settings).unwrap();
    let groq = &chains.chain_for(Capability::Chat, SearchMode::Web)[0];
    assert_eq!(groq.request, RequestShape::ChatCompletions { model: "mixtral-8x7b".into() });
}

#[test]
fn every_standard_spec_names_one_secret() {
    let settings = CatalogSettings { google_cse_id: Some("cx".into()), ..CatalogSettings::default() };
    let chains = ProviderChains::standard(&settings).unwrap();
    for (cap, mode) in [
        (Capability::Chat, SearchMode::Web),
        (Capability::Image, SearchMode::Web),
        (Capability::Search, SearchMode::Research),
        (Capability::Search, SearchMode::Web),
    ] {
        for spec in chains.chain_for(cap, mode) {
            assert!(!spec.secret.is_empty(), "{} has no secret", spec.name);
        }
    }
}

#[test]
fn request_shape_methods() {
    assert_eq!(RequestShape::QueryString.method(), HttpMethod::Get);
    assert_eq!(RequestShape::GoogleCse { engine_id: "cx".into() }.method(), HttpMethod::Get);
    assert_eq!(RequestShape::SerperJson.method(), HttpMethod::Post);
    assert_eq!(RequestShape::HfInputs.method(), HttpMethod::Post);
}

#[test]
fn new_rejects_misplaced_spec() {
    let stray = exa();
    let err = ProviderChains::new(vec![groq("m"), stray], vec![], vec![], vec![]).unwrap_err();
    assert!(matches!(err, ConfigError::ShapeMismatch { ref provider, capability: Capability::Chat } if provider == "exa"));
}

#[test]
fn new_accepts_empty_chains() {
    let chains = ProviderChains::new(vec![], vec![], vec![], vec![]).unwrap();
    assert!(chains.chain_for(Capability::Image, SearchMode::Web).is_empty());
}
