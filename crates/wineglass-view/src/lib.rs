pub mod animation;
pub mod bubble;
pub mod controller;
pub mod delegate;
pub mod frame;
pub mod observer;
pub mod pan;
pub mod surface;

pub use animation::{AnimatedValue, Animation, AnimationEnd, AnimationId, SpringConfig};
pub use bubble::{Bubble, PressState};
pub use controller::{BubbleInfo, FocusState, PanState, WineGlass};
pub use delegate::{EventLog, LayoutEvent, NoopDelegate, WineGlassDelegate};
pub use frame::FrameRequester;
pub use observer::{Listeners, Subscription};
pub use pan::{PanPhase, PanRelease, PanView};
pub use surface::{BubbleTransform, RenderHandle, RenderSurface, SceneCollector, SurfaceNode};
