#[cfg(test)]
mod change_detection_tests {
    use common::protocol::{NodeId, ThresholdCodec, ThresholdPair};
    use node::gate_timer::DEFAULT_SAMPLE_INTERVAL_MS;
    use node::modules::SensorModule;
    use node::sensor::ScriptedDht;
    use node::HumidityTemperatureModule;

    const INTERVAL: u64 = DEFAULT_SAMPLE_INTERVAL_MS;

    fn module_with_readings(
        thresholds: ThresholdPair,
        readings: &[(f32, f32)],
    ) -> HumidityTemperatureModule<ScriptedDht> {
        let mut sensor = ScriptedDht::new();
        for &(temperature, humidity) in readings {
            sensor.push_reading(temperature, humidity);
        }
        let mut module = HumidityTemperatureModule::with_config(
            sensor,
            NodeId::BROADCAST,
            thresholds,
            INTERVAL,
            ThresholdCodec::Binary,
        );
        module.init().unwrap();
        module
    }

    #[test]
    fn test_reanchor_on_accepted_change() {
        let mut module = module_with_readings(
            ThresholdPair::new(1.0, 1.0),
            &[(20.0, 50.0), (21.5, 50.2), (22.4, 50.9)],
        );

        // 初次采样建立基准
        assert!(module.should_send(INTERVAL));
        assert_eq!(module.last_sent(), (20.0, 50.0));

        // 接受的变化把基准重新锚定到越界值本身，而不是上一个原始采样
        assert!(module.should_send(2 * INTERVAL));
        assert_eq!(module.last_sent(), (21.5, 50.0));

        // 相对21.5只差0.9，不触发；基准不漂移
        assert!(!module.should_send(3 * INTERVAL));
        assert_eq!(module.last_sent(), (21.5, 50.0));
    }

    #[test]
    fn test_oscillation_suppressed() {
        // 围绕阈值边界的往复振荡：首次越界后即被抑制
        let mut module = module_with_readings(
            ThresholdPair::new(1.0, 1.0),
            &[(20.0, 50.0), (21.1, 50.0), (20.3, 50.0), (21.0, 50.0)],
        );

        assert!(module.should_send(INTERVAL));
        assert!(module.should_send(2 * INTERVAL)); // 21.1越界，基准→21.1
        assert!(!module.should_send(3 * INTERVAL)); // |20.3-21.1|=0.8
        assert!(!module.should_send(4 * INTERVAL)); // |21.0-21.1|=0.1
    }

    #[test]
    fn test_flags_independent_per_quantity() {
        let mut module = module_with_readings(
            ThresholdPair::new(1.0, 5.0),
            &[(20.0, 50.0), (25.0, 52.0), (25.1, 60.0)],
        );

        module.should_send(INTERVAL);

        // 只有温度越界
        assert!(module.should_send(2 * INTERVAL));
        assert_eq!(module.pending(), (true, false));

        // 只有湿度越界，温度标志不被波及
        assert!(module.should_send(3 * INTERVAL));
        assert_eq!(module.pending(), (false, true));
    }

    #[test]
    fn test_exact_threshold_not_enough() {
        // 比较是严格大于，恰好等于阈值不触发
        let mut module = module_with_readings(
            ThresholdPair::new(1.0, 1.0),
            &[(20.0, 50.0), (21.0, 51.0)],
        );

        module.should_send(INTERVAL);
        assert!(!module.should_send(2 * INTERVAL));
        assert_eq!(module.last_sent(), (20.0, 50.0));
    }

    #[test]
    fn test_end_to_end_decision_scenario() {
        // 读数从(20.0°, 50%)出发，阈值(1.0, 1.0)，
        // 新样本(21.5°, 50.2%)：温度标记发送，湿度不够(0.2 ≤ 1.0)
        let mut module = module_with_readings(
            ThresholdPair::new(1.0, 1.0),
            &[(20.0, 50.0), (21.5, 50.2)],
        );

        module.should_send(INTERVAL);
        assert!(module.should_send(2 * INTERVAL));
        assert_eq!(module.pending(), (true, false));
        assert_eq!(module.last_sent(), (21.5, 50.0));
    }
}
