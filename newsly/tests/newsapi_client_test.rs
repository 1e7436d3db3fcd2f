use mockito::Matcher;
use newsly::news::newsapi::NewsApiClient;
use newsly::news::{fetch_annotated, NewsProvider, NewsQuery};
use newsly::sentiment::Sentiment;

const ARTICLES_BODY: &str = r#"{
    "status": "ok",
    "totalResults": 3,
    "articles": [
        {
            "source": { "id": "bbc-news", "name": "BBC News" },
            "author": null,
            "title": "Team celebrates historic win",
            "description": "A breakthrough season",
            "url": "https://example.com/1",
            "urlToImage": null,
            "publishedAt": "2024-03-14T10:00:00Z",
            "content": null
        },
        42,
        {
            "source": { "id": null, "name": "Reuters" },
            "title": "Markets crash amid crisis",
            "description": null,
            "url": "https://example.com/2",
            "publishedAt": "2024-03-14T09:00:00Z"
        }
    ]
}"#;

#[tokio::test]
async fn test_headlines_search_is_annotated() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/top-headlines")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
            Matcher::UrlEncoded("category".into(), "sports".into()),
            Matcher::UrlEncoded("country".into(), "in".into()),
            Matcher::UrlEncoded("pageSize".into(), "10".into()),
            Matcher::UrlEncoded("sortBy".into(), "publishedAt".into()),
        ]))
        .match_header("user-agent", "Newsly/0.1.0")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ARTICLES_BODY)
        .create_async()
        .await;

    let client = NewsApiClient::new(server.url(), "test-key");
    let query = NewsQuery {
        category: Some("sports".into()),
        country: Some("in".into()),
        ..NewsQuery::default()
    };

    let response = fetch_annotated(&client, &query).await.expect("search");

    assert_eq!(response.status, "ok");
    assert_eq!(response.total_results, 3);
    // the non-object entry is dropped, the others keep their order
    assert_eq!(response.articles.len(), 2);
    assert_eq!(response.articles[0].source.name, "BBC News");
    assert_eq!(response.articles[0].sentiment, Some(Sentiment::Positive));
    assert_eq!(response.articles[1].title, "Markets crash amid crisis");
    assert_eq!(response.articles[1].sentiment, Some(Sentiment::Negative));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_query_search_uses_everything() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/everything")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "climate change".into()),
            Matcher::UrlEncoded("pageSize".into(), "5".into()),
            Matcher::UrlEncoded("sortBy".into(), "relevancy".into()),
            Matcher::Regex("from=\\d{4}-\\d{2}-\\d{2}".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok","totalResults":0,"articles":[]}"#)
        .create_async()
        .await;

    let client = NewsApiClient::new(server.url(), "test-key");
    let mut query = NewsQuery::search("climate change");
    query.page_size = Some(5);

    let response = client.search(&query).await.expect("search");
    assert!(response.articles.is_empty());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_provider_error_is_not_retried() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/top-headlines")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#)
        .expect(1)
        .create_async()
        .await;

    let client = NewsApiClient::new(server.url(), "bad-key");
    let result = client.search(&NewsQuery::default()).await;

    let err = result.err().expect("provider error");
    let message = format!("{:#}", err);
    assert!(message.contains("apiKeyInvalid"));
    assert!(message.contains("Your API key is invalid."));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/top-headlines")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let client = NewsApiClient::new(server.url(), "test-key").with_defaults(5, 2);
    let result = client.search(&NewsQuery::default()).await;

    let err = result.err().expect("server error");
    assert!(err.to_string().contains("503"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_raw_search_passes_body_through() {
    let mut server = mockito::Server::new_async().await;

    let body = r#"{"status":"ok","totalResults":1,"articles":[{"title":"Rust 2.0","source":{"name":"Wire"}}]}"#;
    let mock = server
        .mock("GET", "/everything")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "Show me the latest news about sports".into()),
            Matcher::UrlEncoded("language".into(), "en".into()),
            Matcher::UrlEncoded("pageSize".into(), "5".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = NewsApiClient::new(server.url(), "test-key");
    let raw = client
        .search_raw("Show me the latest news about sports")
        .await
        .expect("raw search");

    let expected: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(raw, expected);
    assert!(raw["articles"][0].get("sentiment").is_none());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_request_timeout() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/everything")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(std::time::Duration::from_secs(3));
            w.write_all(b"too late")
        })
        .create_async()
        .await;

    let client = NewsApiClient::new(server.url(), "test-key").with_defaults(1, 1);
    let result = client.search_raw("slow").await;

    let err = result.err().expect("timeout");
    assert!(err.to_string().contains("timed out"));
}
