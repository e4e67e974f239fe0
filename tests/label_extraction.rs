mod common;

use common::{Call, FakeDocument, FakeField};
use form_autofill::{FillConfig, LabelExtractor, LabelStrategy};

fn extractor() -> LabelExtractor {
    LabelExtractor::from_config(&FillConfig::default())
}

#[tokio::test]
async fn heading_wins_and_block_is_not_consulted() {
    let doc = FakeDocument::new(vec![FakeField::input("Your full name").block("Name block")]);
    let label = extractor().extract(&doc, &0).await;
    assert_eq!(label, "Your full name");
    assert_eq!(doc.calls(), vec![Call::Heading(0)]);
}

#[tokio::test]
async fn falls_back_to_question_block() {
    let doc = FakeDocument::new(vec![FakeField::new("INPUT").block("  Email  ")]);
    let label = extractor().extract(&doc, &0).await;
    assert_eq!(label, "Email");
    assert_eq!(
        doc.calls(),
        vec![Call::Heading(0), Call::Block(0, "Qr7Oae".into())]
    );
}

#[tokio::test]
async fn lookup_errors_count_as_misses() {
    let doc = FakeDocument::new(vec![FakeField::new("TEXTAREA").heading_fails().block("Address")]);
    assert_eq!(extractor().extract(&doc, &0).await, "Address");

    let doc = FakeDocument::new(vec![FakeField::new("TEXTAREA").heading_fails().block_fails()]);
    assert_eq!(extractor().extract(&doc, &0).await, "Unknown");
}

#[tokio::test]
async fn blank_heading_falls_through() {
    let doc = FakeDocument::new(vec![FakeField::input("   \n ").block("Phone")]);
    assert_eq!(extractor().extract(&doc, &0).await, "Phone");
}

#[tokio::test]
async fn no_structure_yields_unknown() {
    let doc = FakeDocument::new(vec![FakeField::new("DIV")]);
    assert_eq!(extractor().extract(&doc, &0).await, "Unknown");
}

#[tokio::test]
async fn custom_strategies_run_in_given_order() {
    let doc = FakeDocument::new(vec![FakeField::input("Heading").block("Block")]);
    let labels = LabelExtractor::new(
        vec![
            LabelStrategy::QuestionBlock {
                marker: "freebirdFormviewerItem".into(),
            },
            LabelStrategy::PrecedingHeading,
        ],
        "?",
    );
    assert_eq!(labels.extract(&doc, &0).await, "Block");
    assert_eq!(
        doc.calls(),
        vec![Call::Block(0, "freebirdFormviewerItem".into())]
    );
}
