//! Metadata hierarchy fixtures

use std::sync::Arc;

use tracemeta_core::{EngineRef, MetaResult};
use tracemeta_engine::{EngineConfig, EngineStats, MemoryEngine};
use tracemeta_ir::{ClockClass, StreamClass, Trace, TraceClass};

use crate::logging::init_test_logging;

/// Fixture configuration
#[derive(Clone, Debug, Default)]
pub struct HierarchyConfig {
    pub engine: EngineConfig,
    /// Stream class supports packets
    pub supports_packets: bool,
    /// Attach a default clock class to the stream class
    pub with_clock_class: bool,
}

impl HierarchyConfig {
    /// Bare trace class, stream class and trace
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Packets and a default clock class
    pub fn full() -> Self {
        HierarchyConfig {
            supports_packets: true,
            with_clock_class: true,
            ..Default::default()
        }
    }
}

/// A trace class with one stream class and one trace, in a fresh engine
pub struct Hierarchy {
    pub memory: Arc<MemoryEngine>,
    pub engine: EngineRef,
    pub trace_class: TraceClass,
    pub stream_class: StreamClass,
    pub clock_class: Option<ClockClass>,
    pub trace: Trace,
}

impl Hierarchy {
    pub fn new() -> MetaResult<Self> {
        Self::with_config(HierarchyConfig::minimal())
    }

    pub fn with_config(config: HierarchyConfig) -> MetaResult<Self> {
        init_test_logging();

        let memory = Arc::new(MemoryEngine::with_config(config.engine));
        let engine: EngineRef = memory.clone();
        let trace_class = TraceClass::new(&engine)?;
        let mut stream_class = trace_class.create_stream_class(None)?;
        stream_class.set_supports_packets(config.supports_packets)?;

        let clock_class = if config.with_clock_class {
            let mut clock_class = trace_class.create_clock_class()?;
            clock_class.set_name("monotonic")?;
            stream_class.set_default_clock_class(&clock_class)?;
            Some(clock_class)
        } else {
            None
        };

        let trace = trace_class.create_trace()?;
        Ok(Hierarchy {
            memory,
            engine,
            trace_class,
            stream_class,
            clock_class,
            trace,
        })
    }

    pub fn live_objects(&self) -> usize {
        self.memory.live_objects()
    }

    pub fn stats(&self) -> EngineStats {
        self.memory.stats()
    }

    /// Drop every wrapper and return the engine
    pub fn into_engine(self) -> Arc<MemoryEngine> {
        self.memory
    }
}
