//! Shift/reduce dispatch, fallback, overflow, and lifecycle behavior.

use std::rc::Rc;

use lalr_table::{RuleId, SymbolId};
use pretty_assertions::assert_eq;

use crate::machine::{FatalError, ParseStatus, Parser, ParserConfig};

use super::fixtures::{
    ab_grammar, fallback_grammar, right_recursion_grammar, Event, Probe, ProbeSemantics,
    RecordingTracer, TestSemantics,
};

fn sym(code: u16) -> SymbolId {
    SymbolId::new(code)
}

#[test]
fn accepts_ab_and_builds_the_value_bottom_up() {
    let g = ab_grammar();
    let mut p = Parser::new(&g, TestSemantics::default());

    assert_eq!(p.feed(sym(1), "a".into()), Ok(ParseStatus::Continue));
    assert_eq!(p.feed(sym(2), "b".into()), Ok(ParseStatus::Continue));
    assert_eq!(p.finish(), Ok(()));

    let s = p.into_semantics();
    assert_eq!(s.result.as_deref(), Some("ab"));
    // A before B before S: reductions fire innermost-first.
    assert_eq!(
        s.events,
        vec![
            Event::Reduce(RuleId::new(1)),
            Event::Reduce(RuleId::new(2)),
            Event::Reduce(RuleId::new(0)),
        ]
    );
}

#[test]
fn feed_after_accept_is_finished() {
    let g = ab_grammar();
    let mut p = Parser::new(&g, TestSemantics::default());
    p.feed(sym(1), "a".into()).unwrap();
    p.feed(sym(2), "b".into()).unwrap();
    p.finish().unwrap();

    assert_eq!(p.feed(sym(1), "a".into()), Err(FatalError::Finished));
    assert_eq!(p.finish(), Err(FatalError::Finished));
    assert_eq!(p.stack_depth(), 0);
}

#[test]
fn accept_clears_the_stack() {
    let counter = Rc::new(());
    let g = ab_grammar();
    let mut p = Parser::new(&g, ProbeSemantics);
    p.feed(sym(1), Probe::live(&counter)).unwrap();
    p.feed(sym(2), Probe::live(&counter)).unwrap();
    assert_eq!(p.finish(), Ok(()));
    drop(p);
    assert_eq!(Rc::strong_count(&counter), 1);
}

#[test]
fn dropping_a_live_parser_releases_stacked_values() {
    let counter = Rc::new(());
    let g = ab_grammar();
    let mut p = Parser::new(&g, ProbeSemantics);
    p.feed(sym(1), Probe::live(&counter)).unwrap();
    assert_eq!(Rc::strong_count(&counter), 2);
    drop(p);
    assert_eq!(Rc::strong_count(&counter), 1);
}

#[test]
fn tracer_records_the_automaton_path() {
    let g = ab_grammar();
    let mut p = Parser::with_tracer(
        &g,
        TestSemantics::default(),
        RecordingTracer::default(),
        ParserConfig::default(),
    );
    p.feed(sym(1), "a".into()).unwrap();
    p.feed(sym(2), "b".into()).unwrap();
    p.finish().unwrap();

    let t = p.tracer();
    // 'a' into s2, 'b' into s4; the end sentinel accepts without a shift.
    assert_eq!(t.shifts, vec![(2, 1), (4, 2)]);
    assert_eq!(t.reduces, vec![1, 2, 0]);
    assert!(t.accepted);
    assert!(t.errors.is_empty());
    assert!(t.discards.is_empty());
}

#[test]
fn fallback_substitutes_once_and_keeps_the_original_symbol() {
    let g = fallback_grammar(true);
    let mut p = Parser::with_tracer(
        &g,
        TestSemantics::default(),
        RecordingTracer::default(),
        ParserConfig::default(),
    );
    // KEYWORD has no entry anywhere; the table maps it to IDENT.
    assert_eq!(p.feed(sym(2), "kw".into()), Ok(ParseStatus::Continue));
    assert_eq!(p.finish(), Ok(()));
    assert_eq!(p.semantics().result.as_deref(), Some("kw"));
    assert_eq!(
        p.tracer().fallbacks,
        vec![("KEYWORD".to_owned(), "IDENT".to_owned())]
    );
    // The frame carries the original terminal, not the substitute.
    assert_eq!(p.tracer().shifts.first(), Some(&(2, 2)));
}

#[test]
fn without_fallback_the_keyword_is_a_syntax_error() {
    let g = fallback_grammar(false);
    let mut p = Parser::new(&g, TestSemantics::default());
    // No error symbol in this grammar: the token is reported and discarded.
    assert_eq!(p.feed(sym(2), "kw".into()), Ok(ParseStatus::Continue));
    assert_eq!(p.feed(sym(1), "id".into()), Ok(ParseStatus::Continue));
    assert_eq!(p.finish(), Ok(()));

    let s = p.into_semantics();
    assert_eq!(
        s.events,
        vec![Event::Error(sym(2)), Event::Reduce(RuleId::new(0))]
    );
}

#[test]
fn stack_overflow_is_fatal_and_sticky() {
    let g = right_recursion_grammar();
    let config = ParserConfig {
        max_depth: 4,
        ..ParserConfig::default()
    };
    let mut p = Parser::with_config(&g, TestSemantics::default(), config);

    // Slot 0 plus three shifted terminals fills the stack.
    assert_eq!(p.feed(sym(1), "a".into()), Ok(ParseStatus::Continue));
    assert_eq!(p.feed(sym(1), "a".into()), Ok(ParseStatus::Continue));
    assert_eq!(p.feed(sym(1), "a".into()), Ok(ParseStatus::Continue));
    assert_eq!(p.feed(sym(1), "a".into()), Err(FatalError::StackOverflow));
    assert_eq!(p.feed(sym(1), "a".into()), Err(FatalError::StackOverflow));
    assert_eq!(p.finish(), Err(FatalError::StackOverflow));

    let s = p.into_semantics();
    assert_eq!(s.events, vec![Event::Overflow]);
}

#[test]
fn overflow_releases_every_owned_value() {
    let counter = Rc::new(());
    let g = right_recursion_grammar();
    let config = ParserConfig {
        max_depth: 3,
        ..ParserConfig::default()
    };
    let mut p = Parser::with_config(&g, ProbeSemantics, config);
    p.feed(sym(1), Probe::live(&counter)).unwrap();
    p.feed(sym(1), Probe::live(&counter)).unwrap();
    assert_eq!(
        p.feed(sym(1), Probe::live(&counter)),
        Err(FatalError::StackOverflow)
    );
    // Both the stacked values and the rejected one are gone.
    assert_eq!(Rc::strong_count(&counter), 1);
}

#[test]
fn deep_right_recursion_fits_under_the_default_limit() {
    let g = right_recursion_grammar();
    let mut p = Parser::new(&g, TestSemantics::default());
    for _ in 0..400 {
        assert_eq!(p.feed(sym(1), "a".into()), Ok(ParseStatus::Continue));
    }
    assert_eq!(p.finish(), Ok(()));
    // One r1 at the tail, then r0 for every outer 'a'.
    assert_eq!(p.semantics().events.len(), 400);
}

#[test]
fn finish_on_empty_input_fails() {
    let g = ab_grammar();
    let mut p = Parser::new(&g, TestSemantics::default());
    assert_eq!(p.finish(), Err(FatalError::ParseFailed));

    let s = p.into_semantics();
    assert_eq!(s.events, vec![Event::Error(SymbolId::END), Event::Failed]);
}

#[test]
fn identical_inputs_produce_identical_event_logs() {
    let g = ab_grammar();
    let run = || {
        let mut p = Parser::new(&g, TestSemantics::default());
        let _ = p.feed(sym(1), "a".into());
        let _ = p.feed(sym(2), "b".into());
        let _ = p.finish();
        p.into_semantics().events
    };
    assert_eq!(run(), run());
}
