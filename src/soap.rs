//! SOAP 1.1 envelopes for the two web service calls the crate makes: `Logon` on the session
//! service and `ProcessXmlString` on the process XML service.

use tracing_error::SpanTrace;
use url::Url;

use crate::error::{Error, Result};
use crate::session::{Credentials, Session};
use crate::xml::Element;

const SOAP_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const TWINFIELD_NS: &str = "http://www.twinfield.com/";

pub const LOGON_ACTION: &str = "http://www.twinfield.com/Logon";
pub const PROCESS_XML_ACTION: &str = "http://www.twinfield.com/ProcessXmlString";

const LOGON_OK: &str = "Ok";

fn envelope(header: Option<Element>, body: Element) -> Element {
    let mut envelope = Element::new("soap:Envelope").with_attribute("xmlns:soap", SOAP_NS);
    if let Some(header) = header {
        envelope.push(Element::new("soap:Header").with_child(header));
    }
    envelope.with_child(Element::new("soap:Body").with_child(body))
}

fn twinfield(name: &str) -> Element {
    Element::new(name).with_attribute("xmlns", TWINFIELD_NS)
}

#[must_use]
pub fn logon_envelope(credentials: &Credentials) -> Element {
    envelope(
        None,
        twinfield("Logon")
            .with_child(Element::new("user").with_text(credentials.user.as_str()))
            .with_child(Element::new("password").with_text(credentials.password.as_str()))
            .with_child(Element::new("organisation").with_text(credentials.organisation.as_str())),
    )
}

/// Wraps a request document; it travels as escaped text inside `<xmlRequest>`.
#[must_use]
pub fn process_xml_envelope(session_id: &str, request: &str) -> Element {
    envelope(
        Some(twinfield("Header").with_child(Element::new("SessionID").with_text(session_id))),
        twinfield("ProcessXmlString").with_child(Element::new("xmlRequest").with_text(request)),
    )
}

fn body(envelope: &Element) -> Result<&Element> {
    let body = envelope.child("Body").ok_or_else(|| Error::MissingElement {
        parent: envelope.name().to_string(),
        element: "Body".to_string(),
    })?;
    if let Some(fault) = body.child("Fault") {
        return Err(Error::SoapFault {
            code: fault.child_text("faultcode").unwrap_or_default().to_string(),
            message: fault.child_text("faultstring").unwrap_or_default().to_string(),
            span_trace: SpanTrace::capture(),
        });
    }
    Ok(body)
}

fn required<'a>(parent: &'a Element, name: &str) -> Result<&'a Element> {
    parent.child(name).ok_or_else(|| Error::MissingElement {
        parent: parent.name().to_string(),
        element: name.to_string(),
    })
}

/// Reads the session token and cluster from a `Logon` reply.
pub fn parse_logon_response(xml: &str) -> Result<Session> {
    let envelope = Element::parse(xml)?;
    let response = required(body(&envelope)?, "LogonResponse")?;

    let result = required(response, "LogonResult")?.text();
    if result != LOGON_OK {
        return Err(Error::Authentication {
            reason: format!("logon result {result}"),
            span_trace: SpanTrace::capture(),
        });
    }

    let session_id = envelope
        .child("Header")
        .and_then(|header| header.child("Header"))
        .and_then(|header| header.child_text("SessionID"))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::Authentication {
            reason: "logon reply carries no session id".to_string(),
            span_trace: SpanTrace::capture(),
        })?;
    let cluster = Url::parse(required(response, "cluster")?.text())
        .map_err(|_| Error::InvalidEndpoint)?;

    Ok(Session::new(session_id, cluster))
}

/// Extracts the (unescaped) result document from a `ProcessXmlString` reply.
pub fn parse_process_xml_response(xml: &str) -> Result<String> {
    let envelope = Element::parse(xml)?;
    let response = required(body(&envelope)?, "ProcessXmlStringResponse")?;
    Ok(required(response, "ProcessXmlStringResult")?.text().to_string())
}

/// Returns the fault carried by an envelope, if the text is an envelope with a fault.
#[must_use]
pub fn fault(xml: &str) -> Option<Error> {
    let envelope = Element::parse(xml).ok()?;
    match body(&envelope) {
        Err(fault @ Error::SoapFault { .. }) => Some(fault),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGON_OK_REPLY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
        <soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
          <soap:Header>
            <Header xmlns="http://www.twinfield.com/"><SessionID>5c1a-77e0</SessionID></Header>
          </soap:Header>
          <soap:Body>
            <LogonResponse xmlns="http://www.twinfield.com/">
              <LogonResult>Ok</LogonResult>
              <nextAction>None</nextAction>
              <cluster>https://c3.twinfield.com</cluster>
            </LogonResponse>
          </soap:Body>
        </soap:Envelope>"#;

    #[test]
    fn builds_logon_envelope() {
        let xml = logon_envelope(&Credentials::new("api", "secret", "ACME"))
            .to_xml()
            .unwrap();
        assert_eq!(
            xml,
            concat!(
                r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body>"#,
                r#"<Logon xmlns="http://www.twinfield.com/"><user>api</user><password>secret</password>"#,
                "<organisation>ACME</organisation></Logon></soap:Body></soap:Envelope>"
            )
        );
    }

    #[test]
    fn reads_session_from_logon_reply() {
        let session = parse_logon_response(LOGON_OK_REPLY).unwrap();
        assert_eq!(session.session_id(), "5c1a-77e0");
        assert_eq!(session.cluster().as_str(), "https://c3.twinfield.com/");
    }

    #[test]
    fn refused_logon_is_an_authentication_error() {
        let reply = LOGON_OK_REPLY.replace(">Ok<", ">Blocked<");
        match parse_logon_response(&reply) {
            Err(Error::Authentication { reason, .. }) => assert_eq!(reason, "logon result Blocked"),
            other => panic!("expected authentication error, got {other:?}"),
        }
    }

    #[test]
    fn process_xml_round_trip() {
        let request = "<read><type>transaction</type></read>";
        let envelope = process_xml_envelope("5c1a-77e0", request);
        let parsed = Element::parse(&envelope.to_xml().unwrap()).unwrap();
        let body = parsed.child("Body").unwrap();
        assert_eq!(
            body.child("ProcessXmlString").unwrap().child_text("xmlRequest"),
            Some(request)
        );
        assert_eq!(
            parsed.child("Header").unwrap().child("Header").unwrap().child_text("SessionID"),
            Some("5c1a-77e0")
        );

        let reply = concat!(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body>"#,
            r#"<ProcessXmlStringResponse xmlns="http://www.twinfield.com/"><ProcessXmlStringResult>"#,
            r#"&lt;transaction result="1"/&gt;"#,
            "</ProcessXmlStringResult></ProcessXmlStringResponse></soap:Body></soap:Envelope>"
        );
        assert_eq!(
            parse_process_xml_response(reply).unwrap(),
            r#"<transaction result="1"/>"#
        );
    }

    #[test]
    fn faults_become_errors() {
        let reply = concat!(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault>"#,
            "<faultcode>soap:Server</faultcode><faultstring>Access denied</faultstring>",
            "</soap:Fault></soap:Body></soap:Envelope>"
        );
        assert!(matches!(
            parse_process_xml_response(reply),
            Err(Error::SoapFault { ref message, .. }) if message == "Access denied"
        ));
        assert!(fault(reply).is_some());
        assert!(fault("<html>Bad gateway</html>").is_none());
    }
}
