//! Property-based tests for plan resolution
//!
//! Uses proptest to verify invariants of the resolution engine:
//! 1. Array order preservation - aggregation never reorders or deduplicates
//! 2. Singleton idempotence - any number of resolutions build once
//! 3. Transient freshness - every resolution builds anew
//! 4. Request-scope isolation - each root call gets its own instance

use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tessera_di::{
	Binding, BindingScope, Context, ImplementationType, Plan, Target, instance, resolve,
	resolve_all,
};

struct Session;

fn counting(scope: BindingScope, calls: &Arc<AtomicUsize>) -> Arc<Binding> {
	let calls = calls.clone();
	Binding::builder("Session").in_scope(scope).to_factory(move |_| {
		calls.fetch_add(1, Ordering::SeqCst);
		Ok(instance(Session))
	})
}

fn plan_for(binding: &Arc<Binding>) -> Plan {
	Plan::new("Session", Some(Target::variable("Session")), vec![binding.clone()])
}

proptest! {
	// Property 1: Array order preservation
	#[test]
	fn prop_array_preserves_order(values in prop::collection::vec(any::<u32>(), 0..16)) {
		let mut plan = Plan::new("Value", Some(Target::variable("Value").array()), vec![]);
		let root = plan.root();
		for value in &values {
			let binding = Binding::builder("Value").to_constant_value(instance(*value));
			plan.add_child(root, "Value", Some(Target::variable("Value").array()), vec![binding])
				.unwrap();
		}

		let resolved = resolve_all::<u32>(&Context::new(plan)).unwrap();

		let resolved: Vec<u32> = resolved.iter().map(|v| **v).collect();
		prop_assert_eq!(resolved, values);
	}

	// Property 2: Singleton idempotence
	#[test]
	fn prop_singleton_builds_once(resolutions in 1usize..10) {
		let calls = Arc::new(AtomicUsize::new(0));
		let binding = counting(BindingScope::Singleton, &calls);

		let first = resolve(&Context::new(plan_for(&binding))).unwrap();
		for _ in 1..resolutions {
			let next = resolve(&Context::new(plan_for(&binding))).unwrap();
			prop_assert!(first.same_instance(&next));
		}

		prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	// Property 3: Transient freshness
	#[test]
	fn prop_transient_builds_every_time(resolutions in 1usize..10) {
		let calls = Arc::new(AtomicUsize::new(0));
		let binding = counting(BindingScope::Transient, &calls);
		let ctx = Context::new(plan_for(&binding));

		for _ in 0..resolutions {
			resolve(&ctx).unwrap();
		}

		prop_assert_eq!(calls.load(Ordering::SeqCst), resolutions);
	}

	// Property 4: Request-scope sharing within a call, isolation across calls
	#[test]
	fn prop_request_scope_per_call(resolutions in 1usize..6, uses in 1usize..6) {
		let calls = Arc::new(AtomicUsize::new(0));
		let session = counting(BindingScope::Request, &calls);
		let holder = Binding::builder("Holder").to_instance(
			ImplementationType::builder::<Vec<Arc<Session>>, _>(uses, move |args| {
				(0..args.len()).map(|i| args.required::<Session>(i)).collect()
			})
			.build(),
		);
		let mut plan = Plan::new("Holder", Some(Target::variable("Holder")), vec![holder]);
		let root = plan.root();
		for _ in 0..uses {
			plan.add_child(root, "Session", Some(Target::argument("Session")), vec![session.clone()])
				.unwrap();
		}
		let ctx = Context::new(plan);

		let mut previous: Option<Arc<Session>> = None;
		for _ in 0..resolutions {
			let held = tessera_di::resolve_as::<Vec<Arc<Session>>>(&ctx).unwrap();
			prop_assert!(held.iter().all(|s| Arc::ptr_eq(s, &held[0])));
			if let Some(previous) = &previous {
				prop_assert!(!Arc::ptr_eq(previous, &held[0]));
			}
			previous = Some(held[0].clone());
		}

		prop_assert_eq!(calls.load(Ordering::SeqCst), resolutions);
	}
}
