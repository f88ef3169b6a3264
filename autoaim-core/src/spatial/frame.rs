use std::fmt;

/// A compile-time tag identifying a spatial reference frame. Carries no
/// runtime data; used only to prevent mixing quantities expressed in
/// different frames.
pub trait Frame: Clone + Copy + fmt::Debug + Eq + PartialEq + 'static {
    const NAME: &'static str;
}

macro_rules! define_frame {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        pub struct $name;

        impl Frame for $name {
            const NAME: &'static str = stringify!($name);
        }
    };
}

define_frame!(World);
define_frame!(ColorCamera);
define_frame!(TurretBase);
define_frame!(TurretYawRef);
define_frame!(TurretPitchRef);
define_frame!(TurretRef);
define_frame!(Launcher);
