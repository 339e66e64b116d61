use twinfield_rs::error::Error;
use twinfield_rs::{
    LineType, MessageKind, Transaction, TransactionKind, TransactionLine, TransactionsApi,
};

use test_utils::{MockService, SALES_TRANSACTION_GET_RESPONSE};

const NOT_FOUND: &str = r#"<read result="0">
    <type>transaction</type>
    <office>001</office>
    <code>SLS</code>
    <number msg="Transaction does not exist." msgtype="error" result="0">999</number>
</read>"#;

const REJECTED: &str = r#"<transactions result="0">
    <transaction destiny="temporary" result="0">
        <header>
            <office>001</office>
            <code>SLS</code>
            <period msg="Period 2013/05 is closed." msgtype="warning">2013/05</period>
        </header>
        <lines>
            <line type="total" id="1">
                <dim1 msg="Account 9999 does not exist." msgtype="error" result="0">9999</dim1>
            </line>
        </lines>
    </transaction>
</transactions>"#;

#[tokio::test]
async fn unknown_transaction_is_not_found() {
    test_utils::do_setup();

    let service = MockService::replying(NOT_FOUND);
    let result = TransactionsApi::new(&service)
        .get(TransactionKind::Sales, "SLS", 999, "001")
        .await;

    match result {
        Err(Error::NotFound {
            entity,
            key,
            messages,
            ..
        }) => {
            assert_eq!(entity, "Transaction");
            assert_eq!(key, "office 001 / SLS 999");
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].element, "number");
            assert_eq!(messages[0].text, "Transaction does not exist.");
        }
        other => panic!("Expected NotFound error, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_document_is_a_validation_error() {
    test_utils::do_setup();

    let mut transaction = Transaction::sales();
    transaction.office = Some("001".to_string());
    transaction.lines = vec![TransactionLine {
        dim1: Some("9999".to_string()),
        ..TransactionLine::new(LineType::Total, "1")
    }];

    let service = MockService::replying(REJECTED);
    let error = TransactionsApi::new(&service)
        .send(&[transaction])
        .await
        .expect_err("document should be rejected");

    let messages = error.messages();
    assert_eq!(messages.len(), 1, "only errors are reported: {messages:?}");
    assert_eq!(messages[0].kind, MessageKind::Error);
    assert_eq!(messages[0].element, "dim1");
    assert!(error.span_trace().is_some());

    let display = error.to_string();
    assert!(
        display.contains("Account 9999 does not exist."),
        "unexpected message: {display}"
    );
}

#[tokio::test]
async fn sending_nothing_is_refused() {
    let service = MockService::echo();
    let result = TransactionsApi::new(&service).send(&[]).await;

    assert!(matches!(result, Err(Error::EmptyDocument)));
    assert!(service.requests().is_empty(), "no request should be made");
}

#[tokio::test]
async fn duplicate_line_ids_never_reach_the_service() {
    let mut transaction = Transaction::sales();
    transaction.lines = vec![
        TransactionLine::new(LineType::Total, "1"),
        TransactionLine::new(LineType::Detail, "1"),
    ];

    let service = MockService::echo();
    let result = TransactionsApi::new(&service).send(&[transaction]).await;

    match result {
        Err(Error::DuplicateLine { id }) => assert_eq!(id, "1"),
        other => panic!("Expected DuplicateLine error, got {other:?}"),
    }
    assert!(service.requests().is_empty());
}

#[tokio::test]
async fn malformed_reply_is_an_xml_error() {
    let service = MockService::replying("<transaction><header></transaction>");
    let result = TransactionsApi::new(&service)
        .get(TransactionKind::Sales, "SLS", 201_300_095, "001")
        .await;

    assert!(
        matches!(result, Err(Error::Xml(_) | Error::InvalidDocument { .. })),
        "got {result:?}"
    );
}

#[tokio::test]
async fn reading_with_another_kind_drops_sales_fields() {
    let service = MockService::replying(SALES_TRANSACTION_GET_RESPONSE);
    let transactions = TransactionsApi::new(&service)
        .get(TransactionKind::Journal, "SLS", 201_300_095, "001")
        .await
        .unwrap();

    let transaction = &transactions[0];
    assert_eq!(transaction.kind, TransactionKind::Journal);
    assert_eq!(transaction.invoice_number, None);
    assert_eq!(transaction.payment_reference, None);
    assert_eq!(transaction.due_date, None);
    assert_eq!(transaction.lines.len(), 3);
}

#[test]
fn transient_errors() {
    assert!(!Error::EmptyDocument.is_transient());
    assert!(
        !Error::InvalidDocument {
            reason: "no root".to_string()
        }
        .is_transient()
    );
}
