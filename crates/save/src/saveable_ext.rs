// ---------------------------------------------------------------------------
// App extension for registering Saveable resources
// ---------------------------------------------------------------------------

use bevy::prelude::*;
use realtime::{Saveable, SaveableRegistry};

/// Extension trait on `App` for one-line saveable registration by host
/// integrations that add their own session resources.
///
/// ```ignore
/// use save::SaveableAppExt;
///
/// fn build(&self, app: &mut App) {
///     app.init_resource::<DistrictCurfews>()
///        .register_saveable::<DistrictCurfews>();
/// }
/// ```
pub trait SaveableAppExt {
    fn register_saveable<T: Saveable>(&mut self) -> &mut Self;
}

impl SaveableAppExt for App {
    fn register_saveable<T: Saveable>(&mut self) -> &mut Self {
        self.init_resource::<SaveableRegistry>();
        self.world_mut()
            .resource_mut::<SaveableRegistry>()
            .register::<T>();
        self
    }
}
