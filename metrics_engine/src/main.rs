//! Metrics Engine v1 - Scenario Harness
//!
//! With two arguments `<investment> <timeline>`, prints the metrics JSON.
//! With none, loads the golden scenario fixtures, evaluates each twice,
//! and reports per-scenario PASS/FAIL against the recorded values.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use metrics_engine::domain::CalculatedMetrics;
use metrics_engine::engine::calculate_metrics;
use metrics_engine::hashing::canonical_hash;
use metrics_engine::invariants::try_validate_invariants;

const FIXTURE_PATHS: [&str; 3] = [
    "tests/golden/scenarios.json",
    "metrics_engine/tests/golden/scenarios.json",
    "../metrics_engine/tests/golden/scenarios.json",
];

const TOLERANCE: f64 = 1e-9;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [investment, timeline] => print_single(investment, timeline),
        [] => run_fixtures(),
        _ => {
            eprintln!("usage: metrics_engine [<investment> <timeline>]");
            ExitCode::from(2)
        }
    }
}

fn print_single(investment: &str, timeline: &str) -> ExitCode {
    let (Ok(investment), Ok(timeline)) = (investment.parse::<f64>(), timeline.parse::<f64>()) else {
        eprintln!("investment and timeline must be numbers");
        return ExitCode::from(2);
    };
    let metrics = calculate_metrics(investment, timeline);
    match serde_json::to_string_pretty(&metrics) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("serialization failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_fixtures() -> ExitCode {
    let Some(path) = FIXTURE_PATHS.iter().find(|p| Path::new(p).exists()) else {
        eprintln!("Could not find scenarios.json. Run from the workspace or crate root.");
        return ExitCode::FAILURE;
    };
    println!("Loaded fixtures from: {}", path);

    let fixtures: Vec<serde_json::Value> = match fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|data| serde_json::from_str(&data).map_err(|e| e.to_string()))
    {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Failed to load fixtures: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut passed = 0;
    for fixture in &fixtures {
        let name = fixture["name"].as_str().unwrap_or("<unnamed>");
        let investment = fixture["investment"].as_f64().unwrap_or_default();
        let timeline = fixture["timeline"].as_f64().unwrap_or_default();

        let expected: CalculatedMetrics = match serde_json::from_value(fixture["expected"].clone()) {
            Ok(m) => m,
            Err(e) => {
                println!("[FAIL] {}: bad fixture: {}", name, e);
                continue;
            }
        };

        let run1 = calculate_metrics(investment, timeline);
        let run2 = calculate_metrics(investment, timeline);

        let mut problems = Vec::new();
        match (canonical_hash(&run1), canonical_hash(&run2)) {
            (Ok(h1), Ok(h2)) if h1 != h2 => {
                problems.push(format!("Determinism fail: run1={} run2={}", h1, h2))
            }
            (Err(e), _) | (_, Err(e)) => problems.push(format!("Hashing failed: {}", e)),
            _ => {}
        }
        if let Err(violation) = try_validate_invariants(&run1) {
            problems.push(violation.to_string());
        }
        problems.extend(diff(&run1, &expected));

        if problems.is_empty() {
            passed += 1;
            println!(
                "[PASS] {}: savings={}, headcount={}, confidence={}, profit={}, ctc={}",
                name,
                run1.total_savings,
                run1.total_headcount_change,
                run1.overall_confidence,
                run1.profit_growth,
                run1.ctc_reduction
            );
        } else {
            println!("[FAIL] {}:", name);
            for p in &problems {
                println!("  {}", p);
            }
        }
    }

    println!("\n===========================================");
    println!("Results: {}/{} passed", passed, fixtures.len());
    if passed == fixtures.len() {
        println!("[OK] All scenario checks PASSED.");
        ExitCode::SUCCESS
    } else {
        println!("[FAIL] Some checks failed.");
        ExitCode::FAILURE
    }
}

fn diff(got: &CalculatedMetrics, expected: &CalculatedMetrics) -> Vec<String> {
    let mut out = Vec::new();
    if got.profit_growth != expected.profit_growth {
        out.push(format!("profitGrowth: {} vs {}", got.profit_growth, expected.profit_growth));
    }
    if got.ctc_reduction != expected.ctc_reduction {
        out.push(format!("ctcReduction: {} vs {}", got.ctc_reduction, expected.ctc_reduction));
    }
    if got.total_savings != expected.total_savings {
        out.push(format!("totalSavings: {} vs {}", got.total_savings, expected.total_savings));
    }
    if got.total_headcount_change != expected.total_headcount_change {
        out.push(format!(
            "totalHeadcountChange: {} vs {}",
            got.total_headcount_change, expected.total_headcount_change
        ));
    }
    if got.overall_confidence != expected.overall_confidence {
        out.push(format!(
            "overallConfidence: {} vs {}",
            got.overall_confidence, expected.overall_confidence
        ));
    }
    for (g, e) in got.agents.iter().zip(&expected.agents) {
        if g != e {
            out.push(format!("agent {} differs: {:?} vs {:?}", g.name, g, e));
        }
    }
    let series = [
        ("profitProjection", &got.profit_projection, &expected.profit_projection),
        ("ctcProjection", &got.ctc_projection, &expected.ctc_projection),
    ];
    for (label, g, e) in series {
        for (i, (gp, ep)) in g.iter().zip(e.iter()).enumerate() {
            let actual_ok = match (gp.actual.value(), ep.actual.value()) {
                (Some(a), Some(b)) => (a - b).abs() <= TOLERANCE,
                (None, None) => true,
                _ => false,
            };
            if gp.week != ep.week || (gp.projected - ep.projected).abs() > TOLERANCE || !actual_ok {
                out.push(format!("{}[{}]: {:?} vs {:?}", label, i, gp, ep));
            }
        }
    }
    out
}
