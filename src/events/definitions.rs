// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical Kleros event and call definitions for log decoding
//!
//! # Event Signatures
//!
//! - **DisputeCreation** (arbitrator): `DisputeCreation(uint256,address)`
//! - **Dispute** (arbitrable, ERC-1497): `Dispute(address,uint256,uint256,uint256)`
//! - **Evidence** (arbitrable, ERC-1497): `Evidence(address,uint256,address,string)`
//!
//! The `sol!` macro generates `SIGNATURE_HASH` constants used as topic 0 in
//! log queries and `decode_log` for turning raw logs into these structs.

use std::fmt::Debug;

use alloy_sol_types::sol;

sol! {
    /// Emitted by the arbitrator when an arbitrable contract opens a dispute.
    ///
    /// Only carries the dispute id and the arbitrable; the evidence group and
    /// meta-evidence ids arrive later through [`Dispute`].
    event DisputeCreation(uint256 indexed _disputeID, address indexed _arbitrable);
}

impl Debug for DisputeCreation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DisputeCreation(disputeID: {}, arbitrable: {})",
            self._disputeID, self._arbitrable
        )
    }
}

sol! {
    /// Emitted by an arbitrable contract to link a dispute to its evidence group.
    event Dispute(
        address indexed _arbitrator,
        uint256 indexed _disputeID,
        uint256 _metaEvidenceID,
        uint256 _evidenceGroupID
    );
}

impl Debug for Dispute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dispute(arbitrator: {}, disputeID: {}, metaEvidenceID: {}, evidenceGroupID: {})",
            self._arbitrator, self._disputeID, self._metaEvidenceID, self._evidenceGroupID
        )
    }
}

sol! {
    /// Emitted by an arbitrable contract when a party submits evidence.
    ///
    /// `_evidence` is an IPFS path to the evidence JSON document.
    event Evidence(
        address indexed _arbitrator,
        uint256 indexed _evidenceGroupID,
        address indexed _party,
        string _evidence
    );
}

impl Debug for Evidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Evidence(arbitrator: {}, evidenceGroupID: {}, party: {}, evidence: {})",
            self._arbitrator, self._evidenceGroupID, self._party, self._evidence
        )
    }
}

sol! {
    /// `KlerosLiquid.disputes(uint256)` public getter.
    ///
    /// Only `subcourtID` is used; the remaining outputs are declared so the
    /// return data decodes.
    function disputes(uint256 _disputeID) external view returns (
        uint96 subcourtID,
        address arbitrated,
        uint256 numberOfChoices,
        uint8 period,
        uint256 lastPeriodChange,
        uint256 drawsInRound,
        uint256 commitsInRound,
        bool ruled
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;
    use alloy_sol_types::SolEvent;

    #[test]
    fn test_signature_hashes_match_abi() {
        assert_eq!(
            DisputeCreation::SIGNATURE_HASH,
            keccak256("DisputeCreation(uint256,address)")
        );
        assert_eq!(
            Dispute::SIGNATURE_HASH,
            keccak256("Dispute(address,uint256,uint256,uint256)")
        );
        assert_eq!(
            Evidence::SIGNATURE_HASH,
            keccak256("Evidence(address,uint256,address,string)")
        );
    }
}
