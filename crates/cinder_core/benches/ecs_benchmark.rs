//! # ECS Performance Benchmark
//!
//! Measures the O(1) paths: entity churn, component attach/detach, dense
//! iteration and arena allocation.
//!
//! Run with: `cargo bench --package cinder_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use bytemuck::{Pod, Zeroable};
use cinder_core::{
    component_registry, Component, Ecs, EcsConfig, PoolAllocator, StackAllocator,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}

impl Component for Position {
    const NAME: &'static str = "Position";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct Velocity {
    x: f32,
    y: f32,
    z: f32,
}

impl Component for Velocity {
    const NAME: &'static str = "Velocity";
}

const ENTITY_COUNT: usize = 100_000;

component_registry! {
    struct Components {
        positions: Position => ENTITY_COUNT,
        velocities: Velocity => ENTITY_COUNT,
    }
}

fn populated_ecs(count: usize) -> Ecs<Components> {
    let mut ecs = Ecs::<Components>::new(&EcsConfig::with_max_entities(ENTITY_COUNT))
        .expect("valid config");
    for i in 0..count {
        let entity = ecs.create_entity().expect("capacity");
        let f = i as f32;
        ecs.add_component(entity, Position { x: f, y: f, z: f }).expect("position");
        ecs.add_component(entity, Velocity { x: 0.1, y: 0.2, z: 0.3 }).expect("velocity");
    }
    ecs
}

/// Benchmark: create then destroy every entity.
fn bench_entity_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_churn");

    for count in [1_000, 10_000, ENTITY_COUNT] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut ecs = Ecs::<Components>::new(&EcsConfig::with_max_entities(ENTITY_COUNT))
                .expect("valid config");
            b.iter(|| {
                for _ in 0..count {
                    black_box(ecs.create_entity().expect("capacity"));
                }
                ecs.reset();
            });
        });
    }

    group.finish();
}

/// Benchmark: detach and re-attach a component in the middle of the dense array.
fn bench_swap_remove(c: &mut Criterion) {
    let mut ecs = populated_ecs(ENTITY_COUNT);
    let victim = cinder_core::Entity::from_raw((ENTITY_COUNT / 2) as u32);

    c.bench_function("swap_remove_reinsert", |b| {
        b.iter(|| {
            let velocity = ecs.remove_component::<Velocity>(victim).expect("present");
            ecs.add_component(victim, black_box(velocity)).expect("room");
        });
    });
}

/// Benchmark: integrate velocities over every position.
fn bench_dense_update(c: &mut Criterion) {
    let mut ecs = populated_ecs(ENTITY_COUNT);

    c.bench_function("dense_update_100k", |b| {
        b.iter(|| {
            let Components { positions, velocities } = ecs.components_mut();
            for (entity, position) in positions.iter_mut() {
                if let Some(velocity) = velocities.get(entity) {
                    position.x += velocity.x * 0.016;
                    position.y += velocity.y * 0.016;
                    position.z += velocity.z * 0.016;
                }
            }
        });
    });
}

/// Benchmark: arena allocate/release round trips.
fn bench_arenas(c: &mut Criterion) {
    let mut pool = PoolAllocator::new(64, 1024).expect("pool");
    c.bench_function("pool_allocate_release", |b| {
        b.iter(|| {
            let handle = pool.allocate().expect("room");
            pool.release(black_box(handle));
        });
    });

    let mut stack = StackAllocator::new(1 << 16).expect("stack");
    c.bench_function("stack_marker_rollback", |b| {
        b.iter(|| {
            let marker = stack.marker();
            black_box(stack.allocate(256));
            black_box(stack.allocate_slice::<f32>(64).expect("room"));
            stack.free_to_marker(marker);
        });
    });
}

criterion_group!(
    benches,
    bench_entity_churn,
    bench_swap_remove,
    bench_dense_update,
    bench_arenas,
);
criterion_main!(benches);
