/// Example: Build a pipeline from a JSON definition and run it
///
/// Usage: cargo run --example run_pipeline [config_file]

use conveyor::{ConveyorConfig, Context, MockRepository, Services};
use serde_json::json;
use std::sync::Arc;
use std::{env, fs};

#[tokio::main]
async fn main() {
    // Get config file path from command line or use default
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/pipelines.json".to_string());

    let config_json = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Failed to read config file '{}': {}", config_path, e);
        std::process::exit(1);
    });

    let config: ConveyorConfig = match serde_json::from_str(&config_json) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Failed to parse configuration:");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!("✓ Successfully parsed configuration!");
    println!("Pipelines defined: {}", config.pipelines.len());

    let Some(definition) = config.pipelines.get("getPost") else {
        eprintln!("Config must define a 'getPost' pipeline");
        std::process::exit(1);
    };
    let pipeline = definition.build();
    println!("Composed 'getPost' from {} stages", pipeline.len());

    // Seed data the fetch stage can find
    let repository = MockRepository::new().with_collection(
        "posts",
        vec![
            json!({"id": "1", "title": "Domain pipelines", "views": 1200}),
            json!({"id": "2", "title": "Composing middleware", "views": 640}),
        ],
    );

    for request in [json!({"id": "1"}), json!({"id": "404"}), json!({})] {
        println!("\n--- Request: {} ---", request);

        let services = Services::new(Arc::new(repository.clone()));
        let context = Context::new(request, services);

        pipeline.run(context).await.resolve(
            |context| {
                println!("✓ Response: {}", context.response().unwrap());
                if let Ok(titles) = context.select("$.posts[*].title") {
                    println!("  Fetched titles: {}", titles);
                }
            },
            |errors| {
                for error in errors {
                    println!("✗ [{}] {}", error.code(), error);
                }
            },
        );
    }
}
