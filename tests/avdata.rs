use avdata::*;
use mockito::{Matcher, Server};

fn client(server: &Server) -> AvClient {
    AvClient::new(AvConfig::new("abc").with_base_url(&format!("{}/query", server.url())))
}

fn daily_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("function".into(), "TIME_SERIES_DAILY".into()),
        Matcher::UrlEncoded("symbol".into(), "IBM".into()),
        Matcher::UrlEncoded("apikey".into(), "abc".into()),
        Matcher::UrlEncoded("datatype".into(), "json".into()),
    ])
}

#[test]
fn test_get_daily_series() {
    let response_body = r#"{
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": "IBM",
            "3. Last Refreshed": "2024-01-05"
        },
        "Time Series (Daily)": {
            "2024-01-05": {"1. open": "160.9000", "2. high": "161.4500", "3. low": "159.6200", "4. close": "159.6900", "5. volume": "4318096"},
            "2024-01-03": {"1. open": "161.0000", "2. high": "161.7300", "3. low": "160.0800", "4. close": "160.1000", "5. volume": "4086059"},
            "2024-01-04": {"1. open": "160.2200", "2. high": "161.9100", "3. low": "160.1000", "4. close": "160.8600", "5. volume": "3998493"}
        }
    }"#;
    let mut server = Server::new();
    let m = server
        .mock("GET", "/query")
        .match_query(daily_query())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(response_body)
        .create();

    let series = client(&server)
        .time_series("IBM", Function::Daily, None)
        .unwrap();
    m.assert();

    assert_eq!("Time Series (Daily)", series.name());
    let dates: Vec<_> = series.iter().map(|(ts, _)| *ts).collect();
    assert_eq!(3, dates.len());
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
    let closes: Vec<f64> = series.iter().map(|(_, bar)| bar.close).collect();
    assert_eq!(vec![160.10, 160.86, 159.69], closes);
}

#[test]
fn test_get_intraday_series() {
    let response_body = r#"{
        "Time Series (5min)": {
            "2024-01-05 19:55:00": {"1. open": "159.70", "2. high": "159.71", "3. low": "159.69", "4. close": "159.70", "5. volume": "120"},
            "2024-01-05 19:50:00": {"1. open": "159.68", "2. high": "159.70", "3. low": "159.68", "4. close": "159.69", "5. volume": "43"}
        }
    }"#;
    let mut server = Server::new();
    let m = server
        .mock("GET", "/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("function".into(), "TIME_SERIES_INTRADAY".into()),
            Matcher::UrlEncoded("interval".into(), "5min".into()),
        ]))
        .with_status(200)
        .with_body(response_body)
        .create();

    let series = client(&server)
        .time_series("IBM", Function::Intraday, Some("5min"))
        .unwrap();
    m.assert();
    let (first, _) = series.first().unwrap();
    assert_eq!("2024-01-05 19:50:00", first.to_string());
}

#[test]
fn test_rate_limit_note() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute and 500 calls per day.", "Time Series (Daily)": {}}"#)
        .create();
    match client(&server).time_series("IBM", Function::Daily, None) {
        Err(Error::RateLimited(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_invalid_symbol() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Error Message": "Invalid API call. Please retry or visit the documentation (https://www.alphavantage.co/documentation/) for TIME_SERIES_DAILY."}"#)
        .create();
    match client(&server).time_series("NOPE", Function::Daily, None) {
        Err(Error::Api(msg)) => assert!(msg.contains("Invalid API call")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_malformed_body() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create();
    assert!(matches!(
        client(&server).time_series("IBM", Function::Daily, None),
        Err(Error::Json(_))
    ));
}

#[test]
fn test_server_error() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/query")
        .match_query(Matcher::Any)
        .with_status(500)
        .create();
    assert!(matches!(
        client(&server).time_series("IBM", Function::Daily, None),
        Err(Error::Status(500))
    ));
}

#[test]
fn test_connection_refused() {
    // nothing listens on the discard port
    let cli = AvClient::new(AvConfig::new("abc").with_base_url("http://127.0.0.1:9/query"));
    assert!(matches!(
        cli.time_series("IBM", Function::Daily, None),
        Err(Error::Reqwest(_))
    ));
}
