// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use block_composer::{
    parse_html, to_html, validate, ActionState, Block, Composer,
    ComposerAction, Document, HeadingLevel, InsertionEvent, ManualClock,
    MediaSource, PolicyViolation, Selection, Slot, TableRejection, TextUpdate,
};

const PAUSE_MS: u64 = 600;

fn composer_with_clock() -> (Composer, ManualClock) {
    let clock = ManualClock::new();
    (Composer::new().with_clock(clock.clone()), clock)
}

fn headings_are_plain(model: &Composer) -> bool {
    let html = model.get_content_as_html();
    html.split("<h")
        .skip(1)
        .filter(|part| part.starts_with('2') || part.starts_with('3'))
        .all(|part| {
            let inner = part.split("</h").next().unwrap_or_default();
            !inner.contains("<strong>")
                && !inner.contains("<em>")
                && !inner.contains("<u>")
                && !inner.contains("<a ")
        })
}

#[test]
fn can_instantiate_a_model_and_call_methods() {
    let mut model = Composer::new();
    model.replace_text("foo");
    model.select(Selection::within(0, Slot::Body, 1, 2));

    let update = model.bold();

    if let TextUpdate::ReplaceAll(r) = &update.text_update {
        assert_eq!(r.replacement_html, "<p>f<strong>o</strong>o</p>");
        assert_eq!(r.selection, Selection::within(0, Slot::Body, 1, 2));
    } else {
        panic!("Expected to receive a ReplaceAll response");
    }
    assert_eq!(
        update.action_state(ComposerAction::Bold),
        Some(ActionState::Reversed)
    );
}

#[test]
fn fast_typing_is_one_history_entry() {
    let (mut model, clock) = composer_with_clock();
    for c in "abcdefghijklmnopqrst".chars() {
        model.replace_text(&c.to_string());
        clock.advance_ms(20);
    }
    clock.advance_ms(PAUSE_MS);
    model.tick();
    assert_eq!(model.history().len(), 2);
}

#[test]
fn a_pause_while_typing_makes_two_entries() {
    let (mut model, clock) = composer_with_clock();
    for c in "abcdefghij".chars() {
        model.replace_text(&c.to_string());
        clock.advance_ms(20);
    }
    clock.advance_ms(PAUSE_MS);
    for c in "klmnopqrst".chars() {
        model.replace_text(&c.to_string());
        clock.advance_ms(20);
    }
    clock.advance_ms(PAUSE_MS);
    model.tick();
    assert_eq!(model.history().len(), 3);

    model.undo();
    assert_eq!(model.get_content_as_html(), "<p>abcdefghij</p>");
}

#[test]
fn table_column_cap_reports_rejection() {
    let mut model = Composer::new();
    model.insert_table();
    for _ in 0..4 {
        model.add_column().unwrap();
    }
    assert_eq!(model.add_column(), Err(TableRejection::ColumnLimit));
    let columns = model
        .document()
        .blocks()
        .iter()
        .find_map(Block::as_table)
        .map(|t| t.column_count());
    assert_eq!(columns, Some(6));
}

#[test]
fn undo_and_redo_are_symmetric() {
    let (mut model, clock) = composer_with_clock();
    let before = model.get_content_as_html();
    let steps: Vec<Box<dyn Fn(&mut Composer)>> = vec![
        Box::new(|m| {
            m.replace_text("Title");
        }),
        Box::new(|m| {
            m.toggle_heading(HeadingLevel::H2);
        }),
        Box::new(|m| {
            m.enter();
        }),
        Box::new(|m| {
            m.replace_text("body");
        }),
        Box::new(|m| {
            m.unordered_list();
        }),
        Box::new(|m| {
            m.insert_table();
        }),
        Box::new(|m| {
            m.add_row().unwrap();
        }),
    ];
    for step in &steps {
        step(&mut model);
        clock.advance_ms(PAUSE_MS);
    }
    let after = model.get_content_as_html();
    assert_ne!(before, after);

    for _ in 0..steps.len() {
        assert!(!model.undo().is_keep());
    }
    assert_eq!(model.get_content_as_html(), before);
    assert!(model.undo().is_keep());

    for _ in 0..steps.len() {
        model.redo();
    }
    assert_eq!(model.get_content_as_html(), after);
}

#[test]
fn headings_never_hold_marks_or_links() {
    let mut model = Composer::from_html(
        "<h2><strong>Bold</strong> <a href=\"https://x.org\">link</a></h2>\
         <p><em>soft</em> text</p>",
    );
    assert_eq!(
        model.get_content_as_html(),
        "<h2>Bold link</h2><p><em>soft</em> text</p>"
    );

    model.select(Selection::within(1, Slot::Body, 0, 9));
    model.toggle_heading(HeadingLevel::H3);
    assert!(headings_are_plain(&model));

    model.select(Selection::within(0, Slot::Body, 0, 4));
    assert!(model.bold().is_keep());
    assert!(model.insert_link("https://x.org").is_keep());
    model.paste(InsertionEvent::html("<strong>pasted</strong>", "pasted"));
    assert!(headings_are_plain(&model));

    model.undo();
    assert!(headings_are_plain(&model));
    model.undo();
    assert!(headings_are_plain(&model));
    model.redo();
    assert!(headings_are_plain(&model));
}

#[test]
fn lists_and_quotes_exclude_each_other() {
    let mut model = Composer::from_html("<blockquote>quote</blockquote>");
    model.unordered_list();
    assert_eq!(model.get_content_as_html(), "<ul><li>quote</li></ul>");
    model.toggle_blockquote();
    assert_eq!(model.get_content_as_html(), "<blockquote>quote</blockquote>");
}

#[test]
fn deleting_all_content_leaves_one_empty_paragraph() {
    let mut model = Composer::from_html(
        "<h2>Title</h2><p>text</p>\
         <figure class=\"image\"><img src=\"https://x.org/a.png\" alt=\"\"></figure>",
    );
    model.select_all();
    model.delete();
    assert_eq!(model.document().blocks(), &[Block::empty_paragraph()]);
    assert_eq!(model.selection(), Selection::default());
    assert_eq!(model.get_content_as_html(), "");
}

#[test]
fn serialization_is_idempotent() {
    let messy = "<div style=\"color:red\"><h1 onclick=\"x()\">Big</h1>\
        <p class=\"align-center\">centred <b>bold</b> <i>it</i> <u>u</u></p>\
        <ol><li>one<ul><li>nested</li></ul></li></ol>\
        <table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>\
        <figure class=\"embed\" data-embed=\"https://video.example/v\"><iframe src=\"https://video.example/v\"></iframe>\
        <figcaption>clip</figcaption></figure><hr><script>evil()</script></div>";
    let once = to_html(&Document::from_blocks(parse_html(messy).unwrap()));
    let twice = to_html(&Document::from_blocks(parse_html(&once).unwrap()));
    assert_eq!(once, twice);
    assert!(!once.contains("script"));
    assert!(!once.contains("style"));
}

#[test]
fn media_without_a_durable_reference_serializes_to_nothing() {
    let mut model = Composer::new();
    model.insert_media(MediaSource::embed("not-a-url"));
    let once = model.get_content_as_html();
    let twice = Composer::from_html(&once).get_content_as_html();
    assert_eq!(once, "");
    assert_eq!(once, twice);
}

#[test]
fn loaded_content_round_trips_through_the_composer() {
    let html = "<h2>Title</h2><p class=\"align-right\">right</p>\
                <ul><li><a href=\"https://x.org\">link</a></li></ul><hr><p>end</p>";
    let model = Composer::from_html(html);
    assert_eq!(model.get_content_as_html(), html);
}

#[test]
fn media_blocks_are_managed_as_units() {
    let mut model = Composer::from_html("<p>intro</p>");
    model.insert_media(MediaSource::image("https://x.org/a.png"));
    model.set_caption(1, "A caption");
    model.select_media(1);
    model.move_up();
    assert!(model.document().blocks()[0].as_media().is_some());
    model.delete_block();
    assert_eq!(model.document().media_count(), 0);
    model.undo();
    assert_eq!(model.document().media_count(), 1);
}

#[test]
fn validation_scenarios() {
    assert_eq!(validate("1234567890", 5000), Err(PolicyViolation::NumericOnly));
    assert_eq!(validate("", 5000), Err(PolicyViolation::ContentRequired));
    assert_eq!(validate("Hi", 5000), Err(PolicyViolation::TooShort));
    let words: Vec<String> = (0..5001).map(|i| format!("distinct{i}")).collect();
    assert_eq!(
        validate(&words.join(" "), 5000),
        Err(PolicyViolation::TooLong { max_words: 5000 })
    );
}

#[test]
fn repetition_scenarios() {
    assert_eq!(
        validate(&"a".repeat(15), 5000),
        Err(PolicyViolation::SpamRepetition)
    );
    let spam = "buy buy buy buy buy buy buy now please friends \
                and also some more text to pass the length limit buy buy buy buy buy \
                buy buy buy buy buy buy buy buy buy buy buy";
    assert_eq!(validate(spam, 5000), Err(PolicyViolation::SpamRepetition));
}

#[test]
fn violations_have_stable_codes() {
    let model = Composer::from_html("<p>12 34</p>");
    let violation = model.validate(5000).unwrap_err();
    assert_eq!(violation.code(), "numeric-only");
}
