// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use super::{
    MacMapHostIdentifier, MacMapIdentifier, VBridgeIdentifier, VBridgeIfIdentifier,
    VNodeIdentifier, VTenantIdentifier, VTerminalIdentifier, VTerminalIfIdentifier,
    VlanMapIdentifier,
};
use crate::mapid::VlanMapId;
use bolero::{Driver, TypeGenerator};
use std::ops::Bound;
use types::{MacVlan, SalNode, VlanId, VnodeName};

impl TypeGenerator for VlanMapId {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        let node = d.produce::<Option<u64>>()?.map(SalNode::new);
        Some(VlanMapId::new(node, d.produce::<VlanId>()?))
    }
}

impl TypeGenerator for VNodeIdentifier {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        let tenant = d.produce::<VnodeName>()?;
        let bridge = d.produce::<VnodeName>()?;
        let leaf = d.produce::<VnodeName>()?;
        let id = match d.gen_u8(Bound::Included(&0), Bound::Included(&7))? {
            0 => VTenantIdentifier::new(tenant).into(),
            1 => VBridgeIdentifier::new(tenant, bridge).into(),
            2 => VTerminalIdentifier::new(tenant, bridge).into(),
            3 => VBridgeIfIdentifier::new(tenant, bridge, leaf).into(),
            4 => VTerminalIfIdentifier::new(tenant, bridge, leaf).into(),
            5 => VlanMapIdentifier::new(tenant, bridge, d.produce()?).into(),
            6 => MacMapIdentifier::new(tenant, bridge).into(),
            _ => MacMapHostIdentifier::new(tenant, bridge, d.produce::<MacVlan>()?).into(),
        };
        Some(id)
    }
}
