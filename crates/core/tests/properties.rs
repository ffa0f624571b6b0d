//! Property tests for the graph printer over randomly generated call graphs.

use graphprof_core::model::{CallGraph, CallGraphBuilder, MethodId};
use graphprof_core::printers::{GraphPrinter, PrintOptions, Printer};
use proptest::prelude::*;

type MethodSpec = (f64, f64, u64);
type EdgeSpec = (usize, usize, f64, f64, u64);

fn method_spec() -> impl Strategy<Value = MethodSpec> {
    (0.0f64..1000.0, 0.0f64..=1.0, 1u64..50)
        .prop_map(|(total, frac, called)| (total, total * frac, called))
}

fn edge_spec() -> impl Strategy<Value = EdgeSpec> {
    (0usize..64, 0usize..64, 0.0f64..=1.0, 0.0f64..=1.0, 1u64..10)
}

fn thread_spec() -> impl Strategy<Value = (Vec<MethodSpec>, Vec<EdgeSpec>)> {
    (
        prop::collection::vec(method_spec(), 1..12),
        prop::collection::vec(edge_spec(), 0..24),
    )
}

fn build(threads: &[(Vec<MethodSpec>, Vec<EdgeSpec>)]) -> CallGraph {
    let mut builder = CallGraphBuilder::new();
    for (tid, (methods, edges)) in threads.iter().enumerate() {
        let mut thread = builder.thread(tid as u64 * 7 + 1);
        for (i, &(total, self_time, called)) in methods.iter().enumerate() {
            thread.method(format!("m{i}"), total, self_time, called);
        }
        for &(from, to, frac, self_frac, called) in edges {
            let caller = from % methods.len();
            let callee = to % methods.len();
            let total = methods[callee].0 * frac;
            thread.call(
                MethodId(caller),
                MethodId(callee),
                total,
                total * self_frac,
                called,
            );
        }
    }
    builder.build()
}

fn block_count(graph: &CallGraph, min_percent: f64) -> usize {
    GraphPrinter::new()
        .render(graph, &PrintOptions::with_min_percent(min_percent))
        .unwrap()
        .lines()
        .filter(|l| l.starts_with("----"))
        .count()
}

proptest! {
    #[test]
    fn children_time_is_total_minus_self(threads in prop::collection::vec(thread_spec(), 1..4)) {
        let graph = build(&threads);
        prop_assert!(graph.validate().is_ok());
        for thread in &graph.threads {
            for method in &thread.methods {
                let expected = method.total_time - method.self_time;
                prop_assert!((method.children_time() - expected).abs() <= 1e-9);
                prop_assert!(method.children_time() >= 0.0);
            }
        }
    }

    #[test]
    fn raising_threshold_never_adds_blocks(
        threads in prop::collection::vec(thread_spec(), 1..4),
        a in 0.0f64..100.0,
        b in 0.0f64..100.0,
    ) {
        let graph = build(&threads);
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(block_count(&graph, high) <= block_count(&graph, low));
        prop_assert_eq!(block_count(&graph, 0.0), graph.method_count());
    }

    #[test]
    fn output_is_deterministic(
        threads in prop::collection::vec(thread_spec(), 1..4),
        min_percent in 0.0f64..100.0,
    ) {
        let graph = build(&threads);
        let options = PrintOptions::with_min_percent(min_percent);
        let printer = GraphPrinter::new();

        let mut first = Vec::new();
        let mut second = Vec::new();
        printer.print(&graph, &options, &mut first).unwrap();
        printer.print(&graph, &options, &mut second).unwrap();
        prop_assert_eq!(&first, &second);

        // Storage order of threads does not matter, only their sequence keys.
        let mut reversed = graph.clone();
        reversed.threads.reverse();
        let mut third = Vec::new();
        printer.print(&reversed, &options, &mut third).unwrap();
        prop_assert_eq!(&first, &third);
    }

    #[test]
    fn percentages_are_finite(threads in prop::collection::vec(thread_spec(), 1..4)) {
        let graph = build(&threads);
        let report = GraphPrinter::new().render(&graph, &PrintOptions::default()).unwrap();
        prop_assert!(!report.contains("NaN"));
        prop_assert!(!report.contains("inf"));
    }
}
