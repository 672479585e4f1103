//! VoIP signalling. These are timeline events exchanged between the two
//! parties of a call.

/// An SDP offer or answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: String,
    pub sdp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallInvite {
    pub call_id: String,
    pub offer: SessionDescription,
    pub version: u64,
    /// Milliseconds the invite stays valid for.
    pub lifetime: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "sdpMid")]
    pub sdp_mid: String,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_m_line_index: u64,
    pub candidate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallCandidates {
    pub call_id: String,
    pub candidates: Vec<Candidate>,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallAnswer {
    pub call_id: String,
    pub answer: SessionDescription,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallHangup {
    pub call_id: String,
    pub version: u64,
}
