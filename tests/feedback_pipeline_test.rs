//! End-to-end tests of the feedback pipeline against the in-memory index.

use kindred::error::KindredError;
use kindred::feedback::{
    FeedbackConfig, FeedbackEngine, FeedbackRequest, InterestingTerms, Seed, TermStyle,
};
use kindred::index::{IndexReader, MemoryIndex, TermVectorEntry};
use kindred::query::{BooleanQuery, MinShouldMatch, Occur, QueryNode};

fn boolean(node: &QueryNode) -> &BooleanQuery {
    match node {
        QueryNode::Boolean(b) => b,
        other => panic!("expected boolean query, got {other:?}"),
    }
}

/// The expansion OR query inside a doc-seed composition.
fn expansion_of(node: &QueryNode) -> &BooleanQuery {
    let outer = boolean(node);
    let must = outer
        .clauses()
        .iter()
        .find(|c| c.occur == Occur::Must)
        .expect("expansion MUST clause");
    boolean(&must.query)
}

fn corpus() -> MemoryIndex {
    let mut index = MemoryIndex::builder("id").build();
    let docs = [
        ("D1", "red shoes red", "fashion"),
        ("D2", "red boots", "fashion"),
        ("D3", "blue hat", "fashion"),
        ("D4", "green shoes", "sports"),
        ("D5", "red laces", "sports"),
        ("D6", "yellow shoes", "sports"),
    ];
    for (key, title, category) in docs {
        index
            .add_document(
                MemoryIndex::doc()
                    .stored("id", key)
                    .stored("category", category)
                    .text("title", title)
                    .text("body", format!("about {title}")),
            )
            .unwrap();
    }
    index
}

fn base_config() -> FeedbackConfig {
    let mut config = FeedbackConfig::new(vec!["title".into()]);
    config.min_doc_freq = 1;
    config
}

#[test]
fn term_count_per_field_never_exceeds_cap() {
    let mut config = base_config();
    config.fields = vec!["title".into(), "body".into()];
    config.max_query_terms_per_field = 2;
    let engine = FeedbackEngine::new(config).unwrap();

    let composed = engine
        .execute(&corpus(), &FeedbackRequest::from_documents(vec![0, 1, 3, 4]))
        .unwrap();

    for field in ["title", "body"] {
        let count = composed.terms().iter().filter(|t| t.field == field).count();
        assert!(count <= 2, "{field} has {count} terms");
    }
}

#[test]
fn selected_terms_respect_doc_freq_band() {
    let index = corpus();
    let mut config = base_config();
    config.min_doc_freq = 2;
    config.max_doc_freq = 3;
    let engine = FeedbackEngine::new(config).unwrap();

    let composed = engine
        .execute(&index, &FeedbackRequest::from_documents(vec![0, 3]))
        .unwrap();
    assert!(!composed.terms().is_empty());
    for term in composed.terms() {
        let df = index.term_doc_freq(&term.field, &term.text).unwrap();
        assert!((2..=3).contains(&df), "{} has df {df}", term.label());
    }
}

#[test]
fn selected_terms_respect_word_length_bounds() {
    let mut config = base_config();
    config.min_word_len = 4;
    config.max_word_len = 5;
    let engine = FeedbackEngine::new(config).unwrap();

    let composed = engine
        .execute(&corpus(), &FeedbackRequest::from_documents(vec![0, 1, 4]))
        .unwrap();
    assert!(!composed.terms().is_empty());
    for term in composed.terms() {
        let len = term.text.chars().count();
        assert!((4..=5).contains(&len), "{} has length {len}", term.label());
    }
}

#[test]
fn normalized_field_boosts_sum_to_one() {
    // title=2.0 body=1.0 with normalization on: effective 0.667 / 0.333
    let mut config = base_config();
    config.fields = vec!["title".into(), "body".into()];
    config.boost_fields.insert("title".into(), 2.0);
    config.boost_fields.insert("body".into(), 1.0);
    let engine = FeedbackEngine::new(config).unwrap();

    let composed = engine
        .execute(&corpus(), &FeedbackRequest::from_documents(vec![0]))
        .unwrap();

    let title = composed.terms().iter().find(|t| t.field == "title").unwrap();
    let body = composed.terms().iter().find(|t| t.field == "body").unwrap();
    assert!((title.field_boost - 2.0 / 3.0).abs() < 1e-6);
    assert!((body.field_boost - 1.0 / 3.0).abs() < 1e-6);
    assert!((title.field_boost + body.field_boost - 1.0).abs() < 1e-6);
}

#[test]
fn raw_frequency_ranks_repeated_term_first() {
    // seed tokens [red, shoes, red], frequency scaling disabled
    let mut index = MemoryIndex::builder("id").build();
    index
        .add_document(
            MemoryIndex::doc()
                .stored("id", "D1")
                .text("title", "red shoes red"),
        )
        .unwrap();
    // equalize document frequencies of both terms
    index
        .add_document(
            MemoryIndex::doc()
                .stored("id", "D2")
                .text("title", "red shoes"),
        )
        .unwrap();

    let engine = FeedbackEngine::new(base_config()).unwrap();
    let composed = engine
        .execute(&index, &FeedbackRequest::from_documents(vec![0]))
        .unwrap();

    let terms = composed.terms();
    assert_eq!(terms[0].text, "red");
    assert_eq!(terms[0].raw_tf, 2);
    assert_eq!(terms[1].text, "shoes");
    assert_eq!(terms[1].raw_tf, 1);
    assert!(terms[0].weight() > terms[1].weight());
}

#[test]
fn mm_hundred_percent_requires_every_clause() {
    let mut config = base_config();
    config.mm = MinShouldMatch::Percent(100);
    let engine = FeedbackEngine::new(config).unwrap();

    let composed = engine
        .execute(&corpus(), &FeedbackRequest::from_documents(vec![0, 1]))
        .unwrap();
    let expansion = expansion_of(composed.query());
    assert!(expansion.should_clause_count() > 1);
    assert_eq!(
        expansion.minimum_should_match(),
        expansion.should_clause_count()
    );
}

#[test]
fn unset_mm_requires_at_least_one_clause() {
    let engine = FeedbackEngine::new(base_config()).unwrap();
    let composed = engine
        .execute(&corpus(), &FeedbackRequest::from_documents(vec![0]))
        .unwrap();
    assert_eq!(expansion_of(composed.query()).minimum_should_match(), 1);
}

#[test]
fn pipeline_is_deterministic_across_runs() {
    let mut config = base_config();
    config.fields = vec!["title".into(), "body".into()];
    let engine = FeedbackEngine::new(config).unwrap();
    let index = corpus();
    let request = FeedbackRequest::from_documents(vec![0, 1, 2, 3]);

    let first = engine.execute(&index, &request).unwrap();
    for _ in 0..5 {
        let again = engine.execute(&index, &request).unwrap();
        assert_eq!(first.terms(), again.terms());
        assert_eq!(first.query(), again.query());
    }
}

#[test]
fn must_match_with_text_seed_is_rejected() {
    let mut config = base_config();
    config.match_fields = vec!["category".into()];
    let engine = FeedbackEngine::new(config).unwrap();

    let err = engine
        .execute(
            &corpus(),
            &FeedbackRequest::from_text("red shoes", vec!["title".into()]),
        )
        .unwrap_err();
    assert!(matches!(err, KindredError::Config(_)));
    assert!(err.to_string().contains("not supported for content stream"));
}

#[test]
fn seed_document_cannot_reappear() {
    let engine = FeedbackEngine::new(base_config()).unwrap();
    let composed = engine
        .execute(&corpus(), &FeedbackRequest::from_documents(vec![0]))
        .unwrap();

    let outer = boolean(composed.query());
    let excluded: Vec<&QueryNode> = outer
        .clauses()
        .iter()
        .filter(|c| c.occur == Occur::MustNot)
        .map(|c| &c.query)
        .collect();
    assert_eq!(excluded, vec![&QueryNode::term("id", "D1")]);
}

#[test]
fn stream_boost_table_applies_to_text_seeds() {
    let mut config = base_config();
    config.normalize_field_boosts = false;
    config.boost_fields.insert("title".into(), 2.0);
    config.stream_boost_fields.insert("title".into(), 5.0);
    let engine = FeedbackEngine::new(config).unwrap();
    let index = corpus();

    let doc_seeded = engine
        .execute(&index, &FeedbackRequest::from_documents(vec![0]))
        .unwrap();
    assert!(doc_seeded.terms().iter().all(|t| t.field_boost == 2.0));

    let text_seeded = engine
        .execute(
            &index,
            &FeedbackRequest::from_text("red shoes red", vec!["title".into()]),
        )
        .unwrap();
    assert!(text_seeded.terms().iter().all(|t| t.field_boost == 5.0));
}

#[test]
fn text_seed_sections_map_to_fields() {
    let mut config = base_config();
    config.fields = vec!["title".into(), "body".into()];
    let engine = FeedbackEngine::new(config).unwrap();

    let seed = Seed::Text(vec![
        kindred::feedback::TextSection::new("red shoes", vec!["title".into()]),
        kindred::feedback::TextSection::new("blue hat", vec!["body".into()]),
    ]);
    let composed = engine
        .execute(&corpus(), &FeedbackRequest::new(seed))
        .unwrap();

    assert!(composed
        .terms()
        .iter()
        .any(|t| t.field == "title" && t.text == "red"));
    assert!(composed
        .terms()
        .iter()
        .any(|t| t.field == "body" && t.text == "hat"));
    // sections never leak into the other field
    assert!(!composed
        .terms()
        .iter()
        .any(|t| t.field == "title" && t.text == "hat"));
}

#[test]
fn stream_seed_maps_head_and_body() {
    let mut config = base_config();
    config.fields = vec!["title".into(), "body".into()];
    config.stream_head_fields = Some(vec!["title".into()]);
    config.stream_body_fields = Some(vec!["body".into()]);
    let engine = FeedbackEngine::new(config).unwrap();

    let seed = engine.config().stream_seed(Some("red shoes"), "blue hat");
    let composed = engine
        .execute(&corpus(), &FeedbackRequest::new(seed))
        .unwrap();

    assert!(composed
        .terms()
        .iter()
        .any(|t| t.field == "title" && t.text == "shoes"));
    assert!(composed
        .terms()
        .iter()
        .any(|t| t.field == "body" && t.text == "hat"));
    assert!(!composed.terms().iter().any(|t| t.field == "title" && t.text == "hat"));
}

#[test]
fn payload_fields_produce_payload_clauses() {
    let mut index = MemoryIndex::builder("id").build();
    index
        .add_document(MemoryIndex::doc().stored("id", "D1").term_vector(
            "skills",
            vec![
                TermVectorEntry::with_payload("java", 2, 80.0),
                TermVectorEntry::with_payload("rust", 1, 95.0),
            ],
        ))
        .unwrap();
    index
        .add_document(MemoryIndex::doc().stored("id", "D2").term_vector(
            "skills",
            vec![TermVectorEntry::with_payload("java", 1, 40.0)],
        ))
        .unwrap();

    let mut config = FeedbackConfig::new(vec!["skills".into()]);
    config.min_doc_freq = 1;
    config.payload_fields.insert("skills".into());
    let engine = FeedbackEngine::new(config).unwrap();

    let composed = engine
        .execute(&index, &FeedbackRequest::from_documents(vec![0]))
        .unwrap();
    let expansion = expansion_of(composed.query());
    for clause in expansion.clauses() {
        let QueryNode::Boost { query, .. } = &clause.query else {
            panic!("expected weighted clause");
        };
        assert!(matches!(**query, QueryNode::PayloadAverage { .. }));
    }
    // mean payload rode through collection
    let java = composed.terms().iter().find(|t| t.text == "java").unwrap();
    assert_eq!(java.payload, Some(80.0));
}

#[test]
fn base_query_gates_and_expansion_reranks() {
    let engine = FeedbackEngine::new(base_config()).unwrap();
    let base = QueryNode::term("category", "fashion");

    let composed = engine
        .execute(
            &corpus(),
            &FeedbackRequest::from_documents(vec![0]).with_base_query(base.clone()),
        )
        .unwrap();

    let outer = boolean(composed.query());
    assert_eq!(outer.clauses().len(), 2);
    assert_eq!(outer.clauses()[0].occur, Occur::Must);
    assert_eq!(outer.clauses()[0].query, base);
    assert_eq!(outer.clauses()[1].occur, Occur::Should);
}

#[test]
fn self_expansion_reranks_original_result_set() {
    let engine = FeedbackEngine::new(base_config()).unwrap();
    let seed_query = QueryNode::term("title", "shoes");

    // D1, D4, D6 match "shoes"
    let composed = engine
        .expand_and_rerank(&corpus(), seed_query.clone(), &[0, 3, 5])
        .unwrap();

    let combined = boolean(composed.query());
    assert_eq!(combined.clauses()[0].occur, Occur::Must);
    assert_eq!(combined.clauses()[0].query, seed_query);
    assert_eq!(combined.clauses()[1].occur, Occur::Should);
    assert!(combined.clauses().iter().all(|c| c.occur != Occur::MustNot));
    assert!(composed.terms().iter().any(|t| t.text == "shoes"));
}

#[test]
fn interesting_terms_styles_render() {
    let mut config = base_config();
    config.interesting_terms = TermStyle::Details;
    let engine = FeedbackEngine::new(config).unwrap();

    let composed = engine
        .execute(&corpus(), &FeedbackRequest::from_documents(vec![0]))
        .unwrap();
    match engine.interesting_terms(&composed) {
        InterestingTerms::Details(details) => {
            assert!(!details.is_empty());
            // descending by weight
            for pair in details.windows(2) {
                assert!(pair[0].weight >= pair[1].weight);
            }
        }
        other => panic!("expected details, got {other:?}"),
    }
}
