//! A test binary built on roster.
//!
//! ```text
//! cargo run --example arith -- --output TAP --seed 7
//! cargo run --example arith -- --alpha --verbose --suite math
//! ```

use roster::{FnTest, Outcome, declare_test, global};

declare_test!(math, adds, |state| {
    state.check(2 + 3 == 5, "2 + 3 should be 5");
    Outcome::Pass
});

declare_test!(math, parses_negative, |state| match "-12".parse::<i32>() {
    Ok(n) => Outcome::from(state.check(n == -12, format!("parsed {n}"))),
    Err(e) => {
        state.fail(e.to_string());
        Outcome::Fail
    }
});

declare_test!(strings, reverses, |state| {
    let reversed: String = "roster".chars().rev().collect();
    state.check(reversed == "retsor", format!("got {reversed}"));
    Outcome::Pass
});

fn main() {
    // Registered at runtime so it can read the environment before deciding to run
    global()
        .register(
            "reads_home",
            "env",
            FnTest::new(|state| Outcome::from(state.check(std::env::var_os("HOME").is_some(), "HOME unset")))
                .with_configure(|_, state| cfg!(unix) || state.skip("not a unix host")),
        )
        .map(|handle| handle.leak())
        .unwrap_or_else(|e| eprintln!("{e}"));

    roster::cli::run();
}
