use super::*;

fn classifier() -> KeywordClassifier {
    KeywordClassifier::standard().unwrap()
}

// =============================================================================
// KeywordClassifier
// =============================================================================

#[test]
fn image_vocabulary() {
    let c = classifier();
    assert_eq!(c.classify("Draw me a cat"), Mode::Image);
    assert_eq!(c.classify("I want a PICTURE of the sea"), Mode::Image);
}

#[test]
fn analyze_vocabulary() {
    let c = classifier();
    assert_eq!(c.classify("summarize this report"), Mode::AnalyzeFile);
    assert_eq!(c.classify("please check tone of my email"), Mode::AnalyzeFile);
}

#[test]
fn search_vocabulary() {
    let c = classifier();
    assert_eq!(c.classify("What is the capital of Ghana?"), Mode::Search(SearchMode::Web));
    assert_eq!(c.classify("how to bake bread"), Mode::Search(SearchMode::Web));
}

#[test]
fn defaults_to_chat() {
    assert_eq!(classifier().classify("hello there"), Mode::Chat);
    assert_eq!(classifier().classify(""), Mode::Chat);
}

#[test]
fn earlier_rule_wins_on_overlap() {
    // "create" (image) and "search" (web) both match.
    assert_eq!(classifier().classify("create a search page"), Mode::Image);
}

#[test]
fn custom_vocabulary_replaces_rules() {
    let words: &[&str] = &["paper", "study"];
    let c = KeywordClassifier::from_vocabulary(&[(words, Mode::Search(SearchMode::Research))]).unwrap();
    assert_eq!(c.classify("find a study on sleep"), Mode::Search(SearchMode::Research));
    assert_eq!(c.classify("draw a cat"), Mode::Chat);
}

#[test]
fn vocabulary_words_are_literal() {
    let words: &[&str] = &["c++"];
    let c = KeywordClassifier::from_vocabulary(&[(words, Mode::Search(SearchMode::Web))]).unwrap();
    assert_eq!(c.classify("learn C++ quickly"), Mode::Search(SearchMode::Web));
    assert_eq!(c.classify("learn c quickly"), Mode::Chat);
}

// =============================================================================
// Mode::parse_explicit / resolve_mode
// =============================================================================

#[test]
fn explicit_labels() {
    assert_eq!(Mode::parse_explicit(Some("Generate Image")), Some(Mode::Image));
    assert_eq!(Mode::parse_explicit(Some("Web Search")), Some(Mode::Search(SearchMode::Web)));
    assert_eq!(Mode::parse_explicit(Some("Research")), Some(Mode::Search(SearchMode::Research)));
    assert_eq!(Mode::parse_explicit(Some("Analyze Files")), Some(Mode::AnalyzeFile));
    assert_eq!(Mode::parse_explicit(Some("chat")), Some(Mode::Chat));
}

#[test]
fn default_and_blank_mean_infer() {
    assert_eq!(Mode::parse_explicit(None), None);
    assert_eq!(Mode::parse_explicit(Some("Default")), None);
    assert_eq!(Mode::parse_explicit(Some("  ")), None);
}

#[test]
fn unknown_label_routes_to_chat() {
    assert_eq!(Mode::parse_explicit(Some("Poetry")), Some(Mode::Chat));
}

#[test]
fn labels_round_trip() {
    for mode in [Mode::Image, Mode::Search(SearchMode::Web), Mode::Search(SearchMode::Research), Mode::AnalyzeFile] {
        assert_eq!(Mode::parse_explicit(Some(mode.label())), Some(mode));
    }
}

#[test]
fn explicit_mode_beats_classifier() {
    let c = classifier();
    assert_eq!(resolve_mode(Some("Research"), "draw a cat", &c), Mode::Search(SearchMode::Research));
    assert_eq!(resolve_mode(None, "draw a cat", &c), Mode::Image);
    assert_eq!(resolve_mode(Some("Default"), "who is Ada Lovelace", &c), Mode::Search(SearchMode::Web));
}

#[test]
fn capability_mapping() {
    assert_eq!(Mode::AnalyzeFile.capability(), Capability::Chat);
    assert_eq!(Mode::Search(SearchMode::Research).capability(), Capability::Search);
    assert_eq!(Mode::Image.capability(), Capability::Image);
}
