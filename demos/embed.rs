use futures::future::try_join;

use function_sdk::types::embed::EmbedRequest;
use function_sdk::FunctionClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = FunctionClient::new(std::env::var("FUNCTION_API_KEY").unwrap_or_default())?;

    // A single client can serve independent calls concurrently.
    let (first, second) = try_join(
        client.embed(EmbedRequest::new("nomic-ai/nomic-embed-text-v1.5").add_input("crab")),
        client.embed(EmbedRequest::new("nomic-ai/nomic-embed-text-v1.5").add_input("ferris")),
    )
    .await?;

    for embedding in first.embeddings.iter().chain(second.embeddings.iter()) {
        let preview = &embedding.embedding[..embedding.embedding.len().min(4)];
        println!("{} dimensions: {:?}...", embedding.embedding.len(), preview);
    }

    Ok(())
}
