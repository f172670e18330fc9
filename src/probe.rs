use serde::{Deserialize, Serialize};

/// Status line of a probed response
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProbeResponse {
    #[serde(rename = "StatusCode", default)]
    pub status_code: u16,
    #[serde(rename = "StatusMsg", default)]
    pub status_msg: String,
}

/// Phase timings as reported by the prober, already formatted for humans
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TracingData {
    #[serde(rename = "ConnectAddr", default)]
    pub connect_addr: String,
    #[serde(rename = "DNSLookupStr", default)]
    pub dns_lookup: String,
    #[serde(rename = "TLSHandShakingStr", default)]
    pub tls_handshake: String,
    #[serde(rename = "TCPConnectionStr", default)]
    pub tcp_connection: String,
    #[serde(rename = "ServerProcessingStr", default)]
    pub server_processing: String,
    #[serde(rename = "ContentTransferStr", default)]
    pub content_transfer: String,
}

/// Outcome of verifying one target
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProbeResult {
    #[serde(rename = "Response", default)]
    pub response: ProbeResponse,
    #[serde(rename = "TracingData", default)]
    pub tracing: TracingData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }
}

impl ProbeResult {
    /// Only an exact 200 passes; redirects and everything else fail
    pub fn verdict(&self) -> Verdict {
        if self.response.status_code == 200 {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn status_line(&self) -> String {
        format!("{} {}", self.response.status_code, self.response.status_msg)
            .trim_end()
            .to_string()
    }

    /// Display rows in fixed order. Empty phases are still listed.
    pub fn rows(&self) -> [(&'static str, String); 7] {
        let t = &self.tracing;
        [
            ("Status", self.status_line()),
            ("IP Address", t.connect_addr.clone()),
            ("DNS Lookup", t.dns_lookup.clone()),
            ("TLS HandShaking", t.tls_handshake.clone()),
            ("TCP Connection", t.tcp_connection.clone()),
            ("Server Processing", t.server_processing.clone()),
            ("Content Transfer", t.content_transfer.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(code: u16) -> ProbeResult {
        ProbeResult {
            response: ProbeResponse { status_code: code, status_msg: String::new() },
            ..Default::default()
        }
    }

    #[test]
    fn test_verdict() {
        assert_eq!(with_status(200).verdict(), Verdict::Pass);
        assert_eq!(with_status(301).verdict(), Verdict::Fail);
        assert_eq!(with_status(500).verdict(), Verdict::Fail);
        assert_eq!(with_status(204).verdict(), Verdict::Fail);
    }

    #[test]
    fn test_rows_fixed_order_with_empty_phases() {
        let mut result = with_status(200);
        result.response.status_msg = "OK".into();
        result.tracing.dns_lookup = "12ms".into();

        let rows = result.rows();
        let labels: Vec<_> = rows.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            [
                "Status",
                "IP Address",
                "DNS Lookup",
                "TLS HandShaking",
                "TCP Connection",
                "Server Processing",
                "Content Transfer"
            ]
        );
        assert_eq!(rows[0].1, "200 OK");
        assert_eq!(rows[2].1, "12ms");
        assert_eq!(rows[3].1, "");
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let result: ProbeResult = serde_json::from_str(
            r#"{"Response":{"StatusCode":301,"StatusMsg":"Moved Permanently"},
                "TracingData":{"ConnectAddr":"1.2.3.4:443","DNSLookupStr":"3ms","TLSHandShakingStr":"40ms"}}"#,
        )
        .unwrap();
        assert_eq!(result.verdict(), Verdict::Fail);
        assert_eq!(result.tracing.connect_addr, "1.2.3.4:443");
        assert_eq!(result.tracing.tls_handshake, "40ms");
        assert_eq!(result.tracing.content_transfer, "");
    }
}
