// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use kb_core::{shortlex_cmp, KnuthBendix, OverlapPolicy, Presentation, RunOutcome};

fn engine(alphabet: &str, relations: &[(&str, &str)]) -> KnuthBendix {
    let p = relations
        .iter()
        .fold(Presentation::new(alphabet), |p, (u, v)| p.with_rule(*u, *v));
    KnuthBendix::new(&p).expect("valid presentation")
}

/// Every word over `alphabet` of length at most `max_len`.
fn words(alphabet: &str, max_len: usize) -> Vec<String> {
    let mut out = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|w| alphabet.chars().map(move |c| format!("{w}{c}")))
            .collect();
        out.extend(frontier.iter().cloned());
    }
    out
}

fn sorted_rules(kb: &KnuthBendix) -> BTreeSet<(String, String)> {
    kb.active_rules().into_iter().collect()
}

fn assert_oriented(kb: &KnuthBendix) {
    let alphabet = kb.alphabet().clone();
    for (lhs, rhs) in kb.active_rules() {
        let l = alphabet.encode(&lhs).expect("encode lhs");
        let r = alphabet.encode(&rhs).expect("encode rhs");
        assert!(shortlex_cmp(&l, &r).is_gt(), "{lhs} -> {rhs} is not reducing");
    }
}

#[test]
fn monogenic_collapse() {
    let mut kb = engine("ab", &[("aa", "a"), ("ab", "a"), ("ba", "a")]);
    assert_eq!(kb.run(), RunOutcome::Confluent);
    let expected: BTreeSet<(String, String)> = [("aa", "a"), ("ab", "a"), ("ba", "a")]
        .iter()
        .map(|(l, r)| ((*l).to_owned(), (*r).to_owned()))
        .collect();
    assert_eq!(sorted_rules(&kb), expected);
    assert_eq!(kb.reduce("aaab").expect("reduce"), kb.reduce("a").expect("reduce"));
    assert_eq!(kb.reduce("bbabb").expect("reduce"), "a");
    assert_eq!(kb.reduce("bbb").expect("reduce"), "bbb");
}

#[test]
fn klein_four_group() {
    let mut kb = engine("ab", &[("aa", ""), ("bb", ""), ("abab", "")]);
    assert_eq!(kb.run(), RunOutcome::Confluent);
    assert_eq!(
        kb.canonical_rules().expect("confluent"),
        vec![
            ("aa".to_owned(), String::new()),
            ("ba".to_owned(), "ab".to_owned()),
            ("bb".to_owned(), String::new()),
        ]
    );
    for w in ["abab", "baba", "aabb", "abba"] {
        assert_eq!(kb.reduce(w).expect("reduce"), "", "{w}");
    }
    let forms: BTreeSet<String> = words("ab", 5)
        .iter()
        .map(|w| kb.reduce(w).expect("reduce"))
        .collect();
    assert_eq!(forms.len(), 4);
}

#[test]
fn symmetric_group_s3_has_six_normal_forms() {
    let mut kb = engine("ab", &[("aa", ""), ("bbb", ""), ("abab", "")]);
    assert_eq!(kb.run(), RunOutcome::Confluent);
    assert_oriented(&kb);
    let forms: BTreeSet<String> = words("ab", 6)
        .iter()
        .map(|w| kb.reduce(w).expect("reduce"))
        .collect();
    assert_eq!(forms.len(), 6, "{forms:?}");
    for w in ["aa", "bbb", "abab", "babbab", "ababab"] {
        let reduced = kb.reduce(w).expect("reduce");
        assert_eq!(kb.reduce(&reduced).expect("reduce"), reduced);
    }
    assert_eq!(kb.reduce("babbab").expect("reduce"), "");
}

#[test]
fn infinite_system_stops_at_rule_bound() {
    // aba = bab has no finite complete system over {a, b} in shortlex order.
    let mut kb = engine("ab", &[("aba", "bab")]);
    assert_eq!(kb.run_bounded(10, None), RunOutcome::Bounded);
    assert!(kb.active_rule_count() <= 10);
    assert!(!kb.is_confluent());
    assert_oriented(&kb);
}

#[test]
fn overlap_bound_alone_reports_bounded() {
    let mut kb = engine("ab", &[("aba", "bab")]);
    kb.settings_mut().max_overlap = Some(6);
    assert_eq!(kb.run_for(Duration::from_secs(10)), RunOutcome::Bounded);
    assert_oriented(&kb);
}

#[test]
fn time_sliced_run_matches_uninterrupted_run() {
    let relations = [("aa", ""), ("bbb", ""), ("ababab", "")];
    let mut reference = engine("ab", &relations);
    assert_eq!(reference.run(), RunOutcome::Confluent);

    let mut sliced = engine("ab", &relations);
    let mut slices = 0;
    while slices < 10_000 && sliced.run_for(Duration::from_micros(50)) == RunOutcome::Interrupted {
        assert_oriented(&sliced);
        slices += 1;
    }
    assert_eq!(sliced.run(), RunOutcome::Confluent);
    assert_eq!(
        sliced.canonical_rules().expect("confluent"),
        reference.canonical_rules().expect("confluent")
    );
    for w in words("ab", 6) {
        assert_eq!(sliced.reduce(&w).expect("reduce"), reference.reduce(&w).expect("reduce"));
    }
}

#[test]
fn bounded_run_resumes_after_lifting_the_bound() {
    let relations = [("aa", ""), ("bbb", ""), ("ababab", "")];
    let mut reference = engine("ab", &relations);
    reference.run();

    let mut kb = engine("ab", &relations);
    assert_eq!(kb.run_bounded(3, None), RunOutcome::Bounded);
    assert!(kb.active_rule_count() <= 3);
    kb.settings_mut().max_rules = None;
    assert_eq!(kb.run(), RunOutcome::Confluent);
    assert_eq!(
        kb.canonical_rules().expect("confluent"),
        reference.canonical_rules().expect("confluent")
    );
}

#[test]
fn stop_handle_interrupts_from_another_thread() {
    let mut kb = engine("ab", &[("aba", "bab")]);
    let handle = kb.stop_handle();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        handle.request_stop();
    });
    assert_eq!(kb.run(), RunOutcome::Interrupted);
    stopper.join().expect("stopper thread");
    assert_oriented(&kb);
    assert!(!kb.confluence_known() || !kb.is_confluent());

    // The interrupted engine is still usable and resumes under a bound.
    let before = kb.active_rule_count();
    let outcome = kb.run_bounded(before + 5, None);
    assert_eq!(outcome, RunOutcome::Bounded);
    assert!(kb.active_rule_count() <= before + 5);
}

#[test]
fn every_overlap_policy_reaches_the_same_system() {
    let relations = [("aa", ""), ("bbb", ""), ("ababab", "")];
    let mut reference = engine("ab", &relations);
    reference.run();
    let expected = reference.canonical_rules().expect("confluent");

    for policy in [OverlapPolicy::Abc, OverlapPolicy::AbBc, OverlapPolicy::MaxAbBc] {
        let mut kb = engine("ab", &relations);
        kb.settings_mut().overlap_policy = policy;
        assert_eq!(kb.run_by_overlap_length(), RunOutcome::Confluent, "{policy:?}");
        assert_eq!(kb.canonical_rules().expect("confluent"), expected, "{policy:?}");
        assert_eq!(kb.settings().max_overlap, None);
    }
}

#[test]
fn stats_track_work() {
    let mut kb = engine("ab", &[("aa", ""), ("bbb", ""), ("ababab", "")]);
    kb.settings_mut().check_confluence_interval = 1;
    kb.run();
    let stats = kb.stats();
    assert!(stats.rules_defined >= 3);
    assert!(stats.max_stack_depth >= 3);
    assert!(stats.overlaps_examined > 0);
    assert!(stats.confluence_checks > 0);
    assert_eq!(stats.inactive_rules, kb.inactive_rule_count());
}
