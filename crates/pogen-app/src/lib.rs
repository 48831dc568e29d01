// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod amount;
pub mod dates;
pub mod forms;
pub mod ids;
pub mod model;
pub mod runtime;
pub mod state;

pub use amount::*;
pub use dates::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use runtime::*;
pub use state::*;
