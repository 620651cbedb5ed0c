use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bribe_rewards::RewardEngine;
use bribe_staking::ShareLedger;
use bribe_types::{AccountId, DEFAULT_REWARD_PRECISION};

fn make_pool(stakers: usize) -> (RewardEngine, ShareLedger, Vec<AccountId>) {
    let mut rewards = RewardEngine::new(DEFAULT_REWARD_PRECISION);
    let mut shares = ShareLedger::new();
    let accounts: Vec<AccountId> = (0..stakers)
        .map(|i| AccountId::new(format!("staker{i}")))
        .collect();
    for (i, id) in accounts.iter().enumerate() {
        rewards.deposit(&mut shares, id, 100 + i as u128).unwrap();
    }
    (rewards, shares, accounts)
}

/// Injection cost must not depend on the number of stakers.
fn bench_inject_proceeds(c: &mut Criterion) {
    let mut group = c.benchmark_group("inject_proceeds");

    for stakers in [1, 100, 10_000] {
        let (mut rewards, shares, _) = make_pool(stakers);
        group.bench_with_input(BenchmarkId::new("stakers", stakers), &stakers, |b, _| {
            b.iter(|| black_box(rewards.inject_proceeds(black_box(1_000), &shares).unwrap()));
        });
    }

    group.finish();
}

fn bench_reward_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("reward_balance_of");

    for stakers in [1, 100, 10_000] {
        let (mut rewards, shares, accounts) = make_pool(stakers);
        rewards.inject_proceeds(1_000_000, &shares).unwrap();
        let probe = accounts[stakers / 2].clone();
        group.bench_with_input(BenchmarkId::new("stakers", stakers), &stakers, |b, _| {
            b.iter(|| black_box(rewards.reward_balance_of(black_box(&probe), &shares).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_inject_proceeds, bench_reward_balance);
criterion_main!(benches);
