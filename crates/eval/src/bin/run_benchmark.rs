use anyhow::Result;
use eval::{get_test_set, BenchmarkResults, Benchmarker};

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Nyaya Triage Benchmark ===\n");

    let api_base_url =
        std::env::var("NYAYA_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let benchmarker = Benchmarker::new(api_base_url);

    let test_set = get_test_set();
    println!("Test set: {} utterances\n", test_set.len());

    let results = benchmarker.run_benchmark(&test_set).await?;

    print_results(&results);

    let results_json = serde_json::to_string_pretty(&results)?;
    std::fs::write("benchmark_results.json", results_json)?;
    println!("\n✅ Results saved to benchmark_results.json");

    Ok(())
}

fn print_results(results: &BenchmarkResults) {
    println!("\n=== RESULTS ===\n");
    println!("  Queries: {} ({} failed)", results.total_queries, results.failed_queries);
    println!("  Intent accuracy: {:.1}%", results.intent_accuracy * 100.0);
    println!("  Kill-switch accuracy: {:.1}%", results.kill_switch_accuracy * 100.0);
    println!("  Avg Latency: {:.0} ms", results.avg_latency_ms);
    println!("  P50 Latency: {:.0} ms", results.p50_latency_ms);
    println!("  P95 Latency: {:.0} ms", results.p95_latency_ms);

    println!("\n📊 CONTEXT ORIGINS:");
    for (origin, count) in &results.context_origins {
        println!("  {}: {}", origin, count);
    }

    println!("\n📊 BY INTENT:");
    for score in &results.by_intent {
        println!("  {}: {:.1}% of {}", score.intent, score.accuracy * 100.0, score.count);
    }
}
