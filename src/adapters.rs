//! Thin glue between the shared resource log and the count-reading
//! ports of the resolver and the settlement loop.

use std::sync::Arc;

use resource_observer::ResourceLog;
use settlement_watch::CountSource;
use tool_start::ports::CounterPort;

/// Count reads over the run's resource log.
#[derive(Clone)]
pub struct LogCounter(pub Arc<ResourceLog>);

impl CounterPort for LogCounter {
    fn current_count(&self) -> u64 {
        self.0.current_count()
    }
}

impl CountSource for LogCounter {
    fn current_count(&self) -> u64 {
        self.0.current_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_observer::ResponseEvidence;

    #[test]
    fn both_ports_see_the_same_log() {
        let log = Arc::new(ResourceLog::new());
        let counter = LogCounter(Arc::clone(&log));

        log.record_response(ResponseEvidence {
            url: "https://cdn.example/app.js".into(),
            status: Some(200),
            decoded_body_len: Some(128),
            ..ResponseEvidence::default()
        });

        assert_eq!(CounterPort::current_count(&counter), 1);
        assert_eq!(CountSource::current_count(&counter), 1);
    }
}
