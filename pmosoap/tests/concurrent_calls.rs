//! Calls running on several threads never mix their envelopes.

use std::sync::{Arc, Mutex};
use std::thread;

use pmosoap::{
    Client, Definitions, GenericHeader, Params, SoapHeader, SoapRequest, Transport,
    TransportError,
};
use xmltree::{Element, XMLNode};

const NAMESPACE: &str = "urn:example:concurrency";

#[derive(Default)]
struct RecordingTransport {
    requests: Mutex<Vec<SoapRequest>>,
}

impl Transport for RecordingTransport {
    fn post(&self, request: &SoapRequest) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(b"<soap:Envelope><soap:Body><Ok/></soap:Body></soap:Envelope>".to_vec())
    }
}

fn elements(parent: &Element) -> Vec<&Element> {
    parent
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .collect()
}

#[test]
fn concurrent_calls_produce_independent_envelopes() {
    const THREADS: usize = 16;
    const CALLS: usize = 20;

    let transport = Arc::new(RecordingTransport::default());
    let base = Client::builder("http://localhost/service?wsdl")
        .definitions(Definitions::new(NAMESPACE))
        .transport(transport.clone())
        .build()
        .unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let mut client = base.clone();
            thread::spawn(move || {
                let header: Arc<dyn SoapHeader> =
                    Arc::new(GenericHeader::new(format!("Worker{i}")).field("Index", i));
                let mut payloads = Vec::new();
                for n in 0..CALLS {
                    let params = Params::new()
                        .with("Thread", i.to_string())
                        .with("Call", n.to_string());
                    client
                        .call_with_headers(&format!("Method{i}"), params, vec![header.clone()])
                        .unwrap();
                    payloads.push(client.payload().to_vec());
                }
                (i, payloads)
            })
        })
        .collect();

    for handle in handles {
        let (i, payloads) = handle.join().unwrap();
        assert_eq!(payloads.len(), CALLS);

        for (n, payload) in payloads.iter().enumerate() {
            let root = Element::parse(payload.as_slice()).unwrap();
            assert_eq!(root.name, "Envelope");

            let children = elements(&root);
            assert_eq!(children.len(), 2);
            assert_eq!(children[0].name, "Header");
            assert_eq!(children[1].name, "Body");

            let headers = elements(children[0]);
            assert_eq!(headers.len(), 1);
            assert_eq!(headers[0].name, format!("Worker{i}"));

            let methods = elements(children[1]);
            assert_eq!(methods.len(), 1);
            let method = methods[0];
            assert_eq!(method.name, format!("Method{i}"));
            assert_eq!(method.namespace.as_deref(), Some(NAMESPACE));

            let args: Vec<(String, String)> = elements(method)
                .into_iter()
                .map(|e| {
                    let text = e.get_text().unwrap_or_default().to_string();
                    (e.name.clone(), text)
                })
                .collect();
            assert_eq!(
                args,
                vec![
                    ("Call".to_string(), n.to_string()),
                    ("Thread".to_string(), i.to_string()),
                ]
            );
        }
    }

    assert_eq!(transport.requests.lock().unwrap().len(), THREADS * CALLS);
}
