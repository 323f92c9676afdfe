use abnfkit::Grammar;
use divan::{Bencher, black_box};
use postal_address::{POSTAL_GRAMMAR, postal_grammar};

fn main() {
    divan::main();
}

#[divan::bench]
fn load_grammar() -> bool {
    black_box(Grammar::parse(black_box(POSTAL_GRAMMAR))).is_ok()
}

#[divan::bench]
fn match_zip_part(bencher: Bencher) {
    let grammar = postal_grammar().unwrap();
    bencher.bench(|| {
        grammar
            .match_rule("zip-part", black_box("Springfield, IL 55555-4444\r\n"))
            .unwrap()
            .is_some()
    });
}

#[divan::bench(args = [1, 16, 256])]
fn match_town_name(bencher: Bencher, words: usize) {
    let grammar = postal_grammar().unwrap();
    let input = vec!["Springfield"; words].join(" ");
    bencher.bench(|| {
        grammar
            .match_rule("town-name", black_box(&input))
            .unwrap()
            .is_some()
    });
}

#[divan::bench]
fn reject_near_miss(bencher: Bencher) {
    let grammar = postal_grammar().unwrap();
    // Fails at the very end, exercising the release path.
    bencher.bench(|| {
        grammar
            .match_rule("zip-part", black_box("Springfield, IL 55555-4444"))
            .unwrap()
            .is_none()
    });
}
