//! POSIX results cross-checked against the `regex` crate
//!
//! Patterns avoid alternation so leftmost-longest (POSIX) and leftmost-first
//! (`regex`) pick the same match.

use fingerprint_ffi::posix_regex::{CompileFlags, ExecFlags, MatchSpan, PosixRegex, MATCH_COUNT};
use regex::RegexBuilder;

const CASES: &[(&str, &[&str])] = &[
    ("[0-9]+", &["abc 12345 def", "no digits here", "7"]),
    ("h[aeiou]llo", &["say hello", "HALLO there", "hxllo"]),
    ("([a-z]+)-([0-9]+)", &["id: abc-42;", "ABC-42", "--"]),
    ("x*y", &["aaaxxxyb", "y", "xxx"]),
    ("[[:alpha:]]+[[:digit:]]{2}", &["..Ab12..", "a1", "zz99"]),
    ("(a)(b)?(c)", &["zac", "abc", "ab"]),
];

fn reference_group0(pattern: &str, subject: &str, icase: bool) -> Option<(usize, usize)> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(icase)
        .build()
        .unwrap();
    re.find(subject).map(|m| (m.start(), m.end()))
}

fn reference_groups(pattern: &str, subject: &str, icase: bool) -> Option<Vec<MatchSpan>> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(icase)
        .build()
        .unwrap();
    re.captures(subject).map(|caps| {
        caps.iter()
            .map(|m| match m {
                Some(m) => MatchSpan::new(m.start() as i64, m.end() as i64),
                None => MatchSpan::UNMATCHED,
            })
            .collect()
    })
}

#[test]
fn group0_matches_reference_for_all_flag_combinations() {
    let optional = [
        CompileFlags::CASE_INSENSITIVE,
        CompileFlags::NO_SUBGROUPS,
        CompileFlags::NEWLINE_SENSITIVE,
    ];

    for mask in 0..(1u8 << optional.len()) {
        let mut flags = CompileFlags::EXTENDED;
        for (bit, flag) in optional.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                flags |= *flag;
            }
        }
        let icase = flags.contains(CompileFlags::CASE_INSENSITIVE);
        let nosub = flags.contains(CompileFlags::NO_SUBGROUPS);

        for (pattern, subjects) in CASES {
            let mut posix = PosixRegex::compile(pattern, flags).unwrap();
            for subject in subjects.iter() {
                let expected = reference_group0(pattern, subject, icase);
                let actual = posix.execute_str(subject, ExecFlags::empty());

                assert_eq!(
                    actual.is_some(),
                    expected.is_some(),
                    "pattern {:?} subject {:?} flags {:?}",
                    pattern,
                    subject,
                    flags
                );
                if nosub {
                    continue;
                }
                if let (Some(set), Some((start, end))) = (actual, expected) {
                    assert_eq!(set.group(0), Some(start..end));
                    assert_eq!(set.group_str(subject, 0), subject.get(start..end));
                }
            }
        }
    }
}

#[test]
fn capture_groups_match_reference() {
    for (pattern, subjects) in CASES {
        let mut posix = PosixRegex::compile(pattern, CompileFlags::EXTENDED).unwrap();
        for subject in subjects.iter() {
            let expected = reference_groups(pattern, subject, false);
            let actual = posix.execute_str(subject, ExecFlags::empty());

            match (actual, expected) {
                (Some(set), Some(groups)) => {
                    assert_eq!(&set.spans()[..groups.len()], &groups[..], "{:?} on {:?}", pattern, subject);
                    assert!(set.spans()[groups.len()..]
                        .iter()
                        .all(|s| *s == MatchSpan::UNMATCHED));
                }
                (None, None) => {}
                (a, e) => panic!("{:?} on {:?}: posix {:?} vs reference {:?}", pattern, subject, a.is_some(), e),
            }
        }
    }
}

#[test]
fn newline_sensitive_matches_multiline_reference() {
    let subject = "first\nsecond line\nthird";
    let mut posix = PosixRegex::compile(
        "^[a-z]+ line$",
        CompileFlags::EXTENDED | CompileFlags::NEWLINE_SENSITIVE,
    )
    .unwrap();
    let expected = regex::Regex::new("(?m)^[a-z]+ line$").unwrap().find(subject).unwrap();

    let set = posix.execute_str(subject, ExecFlags::empty()).unwrap();
    assert_eq!(set.group(0), Some(expected.start()..expected.end()));
}

#[test]
fn capture_offsets_for_a_b_c() {
    let mut posix = PosixRegex::compile("a(b)(c)", CompileFlags::EXTENDED).unwrap();
    let set = posix.execute_str("xabcx", ExecFlags::empty()).unwrap();
    assert_eq!(set.spans()[0], MatchSpan::new(1, 4));
    assert_eq!(set.spans()[1], MatchSpan::new(2, 3));
    assert_eq!(set.spans()[2], MatchSpan::new(3, 4));
    assert_eq!(set.spans().len(), MATCH_COUNT);
}

#[test]
fn repeated_compiles_keep_one_pattern() {
    let mut posix = PosixRegex::new();
    for i in 0..2_000 {
        let pattern = format!("item{}", i);
        posix.recompile_str(&pattern, CompileFlags::EXTENDED).unwrap();
    }
    assert!(posix.execute_str("item1999", ExecFlags::empty()).is_some());
    assert!(posix.execute_str("item1998", ExecFlags::empty()).is_none());
}

#[test]
fn handles_work_across_threads() {
    let workers: Vec<_> = (0..4)
        .map(|n| {
            std::thread::spawn(move || {
                let mut posix =
                    PosixRegex::compile(&format!("w{}([0-9]+)", n), CompileFlags::EXTENDED).unwrap();
                for round in 0..200 {
                    let subject = format!("--w{}{}--", n, round);
                    let set = posix.execute_str(&subject, ExecFlags::empty()).unwrap();
                    assert_eq!(set.group_str(&subject, 1), Some(round.to_string().as_str()));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
}
