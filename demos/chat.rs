use function_sdk::types::chat::{ChatCompleteRequest, ChatMessage};
use function_sdk::FunctionClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = FunctionClient::new(std::env::var("FUNCTION_API_KEY").unwrap_or_default())?;

    let request = ChatCompleteRequest::new("meta/llama-3.1-8b-instruct")
        .add_message(ChatMessage::system("You are a helpful assistant."))
        .add_message(ChatMessage::user("What is the capital of France?"));

    let response = client.chat_complete(request).await?;

    println!("{}: {}", response.response.role, response.response.content);
    println!("({} tokens)", response.tokens);

    Ok(())
}
