use serde_json::{Map, Value};

use crate::arena::NodeId;
use crate::json::{InfoWriter, json_enum, read_bool};

json_enum! {
    /// Physics body created for the children of a physics group.
    pub enum PhysicsBodyType {
        Arcade => "ARCADE",
        P2Js => "P2JS",
        Ninja => "NINJA",
        Box2d => "BOX2D",
    }
    default Arcade;
}

json_enum! {
    /// Sort direction applied by arcade physics to group members.
    pub enum PhysicsSortDirection {
        Null => "NULL",
        LeftRight => "LEFT_RIGHT",
        RightLeft => "RIGHT_LEFT",
        TopBottom => "TOP_BOTTOM",
        BottomTop => "BOTTOM_TOP",
    }
    default Null;
}

/// Container node. Child order is paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupData {
    pub(crate) children: Vec<NodeId>,
    pub editor_closed: bool,
    pub physics_group: bool,
    pub physics_body_type: PhysicsBodyType,
    pub physics_sort_direction: PhysicsSortDirection,
}

impl GroupData {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn read_info(&mut self, info: &Map<String, Value>) {
        self.editor_closed = read_bool(info, "editorClosed", false);
        self.physics_group = read_bool(info, "physicsGroup", false);
        self.physics_body_type = PhysicsBodyType::read(info, "physicsBodyType");
        self.physics_sort_direction = PhysicsSortDirection::read(info, "physicsSortDirection");
    }

    pub(crate) fn write_info(&self, w: &mut InfoWriter<'_>) {
        w.put_default("editorClosed", self.editor_closed, false);
        w.put_default("physicsGroup", self.physics_group, false);
        w.put_default(
            "physicsBodyType",
            self.physics_body_type.as_str(),
            PhysicsBodyType::default().as_str(),
        );
        w.put_default(
            "physicsSortDirection",
            self.physics_sort_direction.as_str(),
            PhysicsSortDirection::default().as_str(),
        );
    }
}
