use crate::error::Result;
use crate::response::Response;
use crate::xml::Element;

/// Something that can process Twinfield request documents.
///
/// [`Client`](crate::Client) implements this over HTTP. Implement it yourself to route requests
/// elsewhere, e.g. to canned replies in tests.
#[allow(async_fn_in_trait)]
pub trait Service {
    /// Processes a serialized request document and returns the serialized result document.
    async fn process_xml(&self, request: &str) -> Result<String>;

    /// Serializes a request document, processes it and parses the result.
    async fn send(&self, document: &Element) -> Result<Response> {
        let request = document.to_xml()?;
        trace!(request = %request, "processing request document");
        let reply = self.process_xml(&request).await?;
        debug!("Result document size: {} bytes", reply.len());
        Response::parse(&reply)
    }
}
