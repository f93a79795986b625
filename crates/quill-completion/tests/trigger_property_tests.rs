/// Property-based tests for flattening and the trigger policy
///
/// Property: the caret marker appears in flattened output exactly as often as
/// the tree holds caret placeholders, typed text can never forge it, and no
/// mode fires without exactly one marker.
use proptest::prelude::*;
use quill_completion::{
    cursor_count, flatten, map_accuracy_to_parameters, should_trigger, DocumentNode,
    FrequencyMode, CURSOR_MARKER,
};

/// Text that sometimes contains the marker literal, as if the user typed it
///
/// Besides whole literals this yields nested literals and bare fragments of
/// the marker, so neighbouring text nodes can spell it out between them.
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z .!?\n]{0,20}",
        "[a-z ]{0,8}".prop_map(|s| format!("{}{}{}", s, CURSOR_MARKER, s)),
        (0..=CURSOR_MARKER.len()).prop_map(|i| {
            format!("{}{}{}", &CURSOR_MARKER[..i], CURSOR_MARKER, &CURSOR_MARKER[i..])
        }),
        (0..=CURSOR_MARKER.len()).prop_map(|i| CURSOR_MARKER[..i].to_string()),
        (0..=CURSOR_MARKER.len()).prop_map(|i| CURSOR_MARKER[i..].to_string()),
    ]
}

fn mode_strategy() -> impl Strategy<Value = FrequencyMode> {
    prop_oneof![
        Just(FrequencyMode::Disabled),
        Just(FrequencyMode::OnKeyPress),
        Just(FrequencyMode::OnWordComplete),
        Just(FrequencyMode::OnSentenceComplete),
    ]
}

/// A document of paragraphs made only of text nodes
fn paragraphs_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(text_strategy(), 0..6), 0..5)
}

fn build_doc(paragraphs: &[Vec<String>], cursor_at: Option<usize>) -> DocumentNode {
    let blocks = paragraphs
        .iter()
        .enumerate()
        .map(|(idx, texts)| {
            let mut children: Vec<DocumentNode> =
                texts.iter().map(|t| DocumentNode::text(t.clone())).collect();
            if cursor_at == Some(idx) {
                children.push(DocumentNode::cursor());
            }
            DocumentNode::element("paragraph", children)
        })
        .collect();
    DocumentNode::root(blocks)
}

proptest! {
    /// A marker split at any point across two text nodes is not reassembled
    #[test]
    fn prop_split_marker_not_forged(split in 0..=CURSOR_MARKER.len(), prefix in "[a-z ]{0,6}") {
        let doc = DocumentNode::root(vec![DocumentNode::element(
            "paragraph",
            vec![
                DocumentNode::text(format!("{}{}", prefix, &CURSOR_MARKER[..split])),
                DocumentNode::text(&CURSOR_MARKER[split..]),
            ],
        )]);
        let text = flatten(&doc);
        prop_assert_eq!(cursor_count(&text), 0);
        prop_assert!(!should_trigger(&text, FrequencyMode::OnKeyPress));
    }

    /// Typed marker literals never survive flattening
    #[test]
    fn prop_no_cursor_without_placeholder(paragraphs in paragraphs_strategy()) {
        let doc = build_doc(&paragraphs, None);
        prop_assert_eq!(cursor_count(&flatten(&doc)), 0);
    }

    /// One placeholder yields exactly one marker
    #[test]
    fn prop_single_placeholder_single_marker(
        paragraphs in paragraphs_strategy().prop_filter("needs a paragraph", |p| !p.is_empty()),
        pick in any::<prop::sample::Index>(),
    ) {
        let at = pick.index(paragraphs.len());
        let doc = build_doc(&paragraphs, Some(at));
        prop_assert_eq!(cursor_count(&flatten(&doc)), 1);
    }

    /// Flattening is idempotent
    #[test]
    fn prop_flatten_idempotent(paragraphs in paragraphs_strategy()) {
        let doc = build_doc(&paragraphs, paragraphs.first().map(|_| 0));
        prop_assert_eq!(flatten(&doc), flatten(&doc));
    }

    /// No mode fires without a marker
    #[test]
    fn prop_no_marker_never_triggers(text in "[a-zA-Z .!?\n]{0,40}", mode in mode_strategy()) {
        prop_assert!(!should_trigger(&text, mode));
    }

    /// Disabled never fires
    #[test]
    fn prop_disabled_never_triggers(text in text_strategy()) {
        prop_assert!(!should_trigger(&text, FrequencyMode::Disabled));
    }

    /// Key-press mode fires whenever exactly one marker is present
    #[test]
    fn prop_key_press_fires_with_marker(before in "[a-zA-Z .]{0,20}", after in "[a-zA-Z .]{0,20}") {
        let text = format!("{}{}{}", before, CURSOR_MARKER, after);
        prop_assert!(should_trigger(&text, FrequencyMode::OnKeyPress));
    }

    /// Mapped parameters stay within their documented bounds for any input
    #[test]
    fn prop_parameters_within_bounds(accuracy in -1000.0f64..1000.0) {
        let params = map_accuracy_to_parameters(accuracy);
        prop_assert!((0.5..=0.9 + 1e-9).contains(&params.temperature));
        prop_assert!((10..=100).contains(&params.top_k));
        prop_assert!((1.0..=1.5 + 1e-9).contains(&params.repeat_penalty));
        prop_assert!(params.mirostat <= 2);
        prop_assert!((1024..=4096).contains(&params.num_ctx));
        prop_assert_eq!(params.num_predict, 50);
    }
}
