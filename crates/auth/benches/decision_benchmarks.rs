use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use gatehouse_auth::{
    AccessDecisionEngine, AccessPredicate, AccessRule, Principal, RuleTable, role_set,
};
use gatehouse_core::{RequestPath, Username};

/// Table with `n` non-matching prefix rules ahead of the real ones, so the
/// scan cost grows with `n`.
fn table_with_padding(n: usize) -> RuleTable {
    let mut rules: Vec<AccessRule> = (0..n)
        .map(|i| {
            AccessRule::parse(&format!("/padding/{i}/**"), AccessPredicate::DenyAll)
                .expect("valid pattern")
        })
        .collect();

    rules.extend([
        AccessRule::parse("/api/public/**", AccessPredicate::PermitAll).expect("valid pattern"),
        AccessRule::parse("/api/admin/**", AccessPredicate::RequireAnyOf(role_set(["ADMIN"])))
            .expect("valid pattern"),
        AccessRule::parse(
            "/api/user/**",
            AccessPredicate::RequireAnyOf(role_set(["USER", "ADMIN"])),
        )
        .expect("valid pattern"),
        AccessRule::parse("**", AccessPredicate::RequireAuthenticated).expect("valid pattern"),
    ]);

    RuleTable::new(rules).expect("valid table")
}

fn bench_decide(c: &mut Criterion) {
    let principal =
        Principal::authenticated(Username::parse("user").expect("username"), role_set(["USER"]));
    let path = RequestPath::from_normalized("/api/user/profile/settings").expect("path");

    let mut group = c.benchmark_group("decide");
    for n in [0usize, 16, 128, 1024] {
        let engine = AccessDecisionEngine::new(table_with_padding(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| engine.decide(black_box(&principal), black_box(&path)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decide);
criterion_main!(benches);
