use std::io::Write;

use function_sdk::types::chat::{ChatCompleteStreamRequest, ChatMessage};
use function_sdk::FunctionClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = FunctionClient::builder()
        .api_key(std::env::var("FUNCTION_API_KEY").unwrap_or_default())
        .build()?;

    let request = ChatCompleteStreamRequest::new("meta/llama-3.1-8b-instruct")
        .add_message(ChatMessage::user("Tell me a story about a Rust programmer."));

    let mut response = client.chat_complete_stream(request).await?;
    print!("{}: ", response.role);

    let mut tokens = 0;
    while let Some(token) = response.token_stream.read().await? {
        print!("{}", token);
        std::io::stdout().flush()?;

        tokens += 1;
        if tokens == 200 {
            // Long enough; tell the server to stop generating.
            response.token_stream.close().await?;
        }
    }
    println!();

    Ok(())
}
