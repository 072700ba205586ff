//! Console commands end to end against a mock backend.

mod common;

use clap::Parser;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{anonymous_context, issue_token, logged_in_context, now, product_json};
use sapore_console::cli::Cli;
use sapore_console::commands::{dispatch, ingredients};
use sapore_console::error::{CommandResult, ErrorCode};
use sapore_console::output::CommandOutput;
use sapore_console::state::AppContext;

async fn sapore(ctx: &AppContext, args: &[&str]) -> CommandResult<CommandOutput> {
    let cli = Cli::try_parse_from(std::iter::once("sapore").chain(args.iter().copied())).unwrap();
    dispatch(ctx, cli.command, now()).await
}

// =============================================================================
// Session
// =============================================================================

#[tokio::test]
async fn test_login_then_whoami() {
    let server = MockServer::start().await;
    let ctx = anonymous_context(&server);

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_partial_json(json!({ "email": "ana@santsapore.com.br" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": issue_token("ana@santsapore.com.br") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let out = sapore(&ctx, &["login", "--email", "ana@santsapore.com.br", "--password", "s3nha"])
        .await
        .unwrap();
    assert_eq!(out.text(), "Bem-vindo(a), Ana Souza.");

    let out = sapore(&ctx, &["whoami"]).await.unwrap();
    assert!(out.text().contains("ana@santsapore.com.br"), "{}", out.text());
    assert_eq!(out.json()["expired"], false);

    sapore(&ctx, &["logout"]).await.unwrap();
    let err = sapore(&ctx, &["whoami"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionExpired);
}

#[tokio::test]
async fn test_backend_commands_need_a_login() {
    let server = MockServer::start().await;
    let ctx = anonymous_context(&server);

    let err = sapore(&ctx, &["orders", "list"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionExpired);
    assert_eq!(err.exit_code(), 77);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_token_is_reported_as_expired_session() {
    let server = MockServer::start().await;
    let ctx = logged_in_context(&server);

    Mock::given(method("GET"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = sapore(&ctx, &["customers", "list"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionExpired);
}

// =============================================================================
// Orders
// =============================================================================

async fn mount_order_fixtures(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/customers/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "name": "Padaria Central",
            "document": "11.222.333/0001-81",
            "modality": "WHOLESALE"
        })))
        .mount(server)
        .await;

    let mut brigadeiro = product_json(1, "Brigadeiro", "CALCULATED");
    brigadeiro["salePrice"] = json!(2.5);
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([brigadeiro])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_order_create_prices_items_from_catalogue() {
    let server = MockServer::start().await;
    let ctx = logged_in_context(&server);
    mount_order_fixtures(&server).await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_partial_json(json!({
            "customerId": "7",
            "total": 7.5,
            "status": "PENDING",
            "deliveryDate": "2026-10-20"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 300,
            "customerId": 7,
            "items": [{ "productId": 1, "quantity": 3, "unitPrice": 2.5, "subtotal": 7.5 }],
            "total": 7.5,
            "status": "PENDING",
            "orderDate": "2026-10-16T12:00:00Z",
            "deliveryDate": "2026-10-20"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let out = sapore(
        &ctx,
        &["orders", "create", "--customer", "7", "--item", "1=2", "--item", "1=1", "--delivery", "20/10/2026"],
    )
    .await
    .unwrap();

    assert_eq!(out.text(), "Pedido 300 registrado: 1 itens, total R$ 7,50.");
    assert_eq!(out.json()["id"], "300");
}

#[tokio::test]
async fn test_order_with_unknown_product_is_not_sent() {
    let server = MockServer::start().await;
    let ctx = logged_in_context(&server);
    mount_order_fixtures(&server).await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = sapore(&ctx, &["orders", "create", "--customer", "7", "--item", "99=1"])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "Produto 99 não encontrado.");
}

#[tokio::test]
async fn test_missing_order_exits_not_found() {
    let server = MockServer::start().await;
    let ctx = logged_in_context(&server);

    Mock::given(method("GET"))
        .and(path("/orders/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = sapore(&ctx, &["orders", "show", "999"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.exit_code(), 66);
}

// =============================================================================
// Reports
// =============================================================================

fn order_json(id: u64, customer: u64, product: u64, quantity: i64, price: f64, status: &str, date: &str) -> serde_json::Value {
    let subtotal = price * quantity as f64;
    json!({
        "id": id,
        "customerId": customer,
        "items": [{ "productId": product, "quantity": quantity, "unitPrice": price, "subtotal": subtotal }],
        "total": subtotal,
        "status": status,
        "orderDate": date
    })
}

#[tokio::test]
async fn test_report_dashboard_for_last_month() {
    let server = MockServer::start().await;
    let ctx = logged_in_context(&server);

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            order_json(1, 7, 1, 10, 2.5, "DELIVERED", "2026-10-05T10:00:00Z"),
            order_json(2, 7, 2, 2, 40.0, "PENDING", "2026-10-10T10:00:00Z"),
            order_json(3, 9, 1, 100, 2.5, "CANCELLED", "2026-10-12T10:00:00Z"),
            order_json(4, 9, 2, 5, 40.0, "DELIVERED", "2026-06-01T10:00:00Z"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "name": "Padaria Central", "document": "11.222.333/0001-81", "modality": "WHOLESALE" },
            { "id": 9, "name": "Maria Lima", "document": "529.982.247-25", "modality": "RETAIL" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json(1, "Brigadeiro", "CALCULATED"),
            product_json(2, "Bolo de cenoura", "CALCULATED")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/expenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "description": "Caixas", "category": "Embalagens", "amount": 12.5, "date": "2026-10-01" },
            { "id": 2, "description": "Gás", "category": "", "amount": 7.5, "date": "2026-10-03" },
            { "id": 3, "description": "Forno", "category": "Equipamentos", "amount": 900.0, "date": "2026-08-01" }
        ])))
        .mount(&server)
        .await;

    let out = sapore(&ctx, &["report", "--window", "month"]).await.unwrap();
    let text = out.text();

    assert!(text.contains("Faturamento: R$ 25,00"), "{}", text);
    assert!(text.contains("Despesas: R$ 20,00"), "{}", text);
    assert!(text.contains("Resultado: R$ 5,00"), "{}", text);
    assert!(text.contains("Pedidos: 3"), "{}", text);
    assert!(text.contains("Melhor cliente: Padaria Central (2 pedidos)"), "{}", text);
    assert!(text.contains("Mais vendido: Brigadeiro (10 un)"), "{}", text);
    assert!(text.contains("Menos vendido: Bolo de cenoura (2 un)"), "{}", text);
    assert!(text.contains("Outros"), "{}", text);
    assert!(!text.contains("Equipamentos"), "{}", text);

    assert_eq!(out.json()["netResult"], 5.0);
    assert_eq!(out.json()["summary"]["orderCount"], 3);
}

// =============================================================================
// Pricing
// =============================================================================

#[tokio::test]
async fn test_pricing_commit_shows_refetched_board() {
    let server = MockServer::start().await;
    let ctx = logged_in_context(&server);

    // First load: product 5 still pending
    Mock::given(method("GET"))
        .and(path("/pricing/products/pending"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product_json(5, "Brigadeiro", "NOT_CALCULATED")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pricing/products/priced"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Refetch after commit
    Mock::given(method("GET"))
        .and(path("/pricing/products/pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let mut priced = product_json(5, "Brigadeiro", "CALCULATED");
    priced["salePrice"] = json!(7.5);
    Mock::given(method("GET"))
        .and(path("/pricing/products/priced"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([priced])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/pricing/products/5/simulate"))
        .and(body_partial_json(json!({ "markupPercent": 150.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ingredientCost": 30.0,
            "costPerUnit": 3.0,
            "suggestedPrice": 7.5,
            "unitProfit": 4.5,
            "profitMargin": 60.0,
            "markup": 150.0
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pricing/products/5/pricing"))
        .and(body_partial_json(json!({ "salePrice": 7.5, "costPrice": 3.0 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let out = sapore(&ctx, &["pricing", "commit", "5", "--markup", "150"]).await.unwrap();
    let text = out.text();

    assert!(text.contains("Preço sugerido: R$ 7,50"), "{}", text);
    assert!(text.contains("Preço salvo."), "{}", text);
    assert!(text.contains("A precificar (0)"), "{}", text);
    assert!(text.contains("Precificados (1)"), "{}", text);
    assert_eq!(out.json()["priced"][0]["id"], "5");
    assert_eq!(out.json()["pending"], json!([]));
}

#[tokio::test]
async fn test_margin_strategy_needs_margin_before_any_request() {
    let server = MockServer::start().await;
    let ctx = logged_in_context(&server);

    let err = sapore(&ctx, &["pricing", "simulate", "5", "--strategy", "margin"])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Invalid);
    assert!(server.received_requests().await.unwrap().is_empty());
}

// =============================================================================
// Ingredient Search
// =============================================================================

#[tokio::test]
async fn test_watch_searches_only_after_typing_stops() {
    let server = MockServer::start().await;
    let ctx = logged_in_context(&server);

    Mock::given(method("GET"))
        .and(path("/pricing/ingredients"))
        .and(query_param("search", "leite"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "i1", "name": "Leite condensado", "unit": "kg", "unitCost": 12.9 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let input: &[u8] = b"le\nlei\nleite\n";
    let mut out = Vec::new();
    let searches = ingredients::watch(&ctx, input, &mut out).await.unwrap();

    assert_eq!(searches, 1);
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Leite condensado"), "{}", printed);
}

#[tokio::test]
async fn test_convert_needs_no_login() {
    let server = MockServer::start().await;
    let ctx = anonymous_context(&server);

    let out = sapore(&ctx, &["convert", "1,5", "kg", "g"]).await.unwrap();
    assert_eq!(out.text(), "1,5 kg = 1500 g");
}

#[tokio::test]
async fn test_bad_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("console.toml");
    std::fs::write(&path, "[api]\nbase_url = \"http://localhost:8080\"\ntimeout_secs = 0\n").unwrap();

    let cli = Cli::try_parse_from(["sapore", "--config", path.to_str().unwrap(), "whoami"]).unwrap();
    let err = sapore_console::execute(cli).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Invalid);
    assert_eq!(err.title, "Configuração inválida");
}
