#[cfg(test)]
mod report_cycle_tests {
    use collector::storage::Storage;
    use collector::CircularBuffer;
    use common::hal::simulator::{SimChannel, SimRadio};
    use common::hal::RadioInterface;
    use common::protocol::{
        decode_scalar, MessageType, NodeId, Quantity, ThresholdPair, MAX_MESSAGE_SIZE,
    };
    use node::modules::SensorModule;
    use node::sensor::ScriptedDht;
    use node::HumidityTemperatureModule;

    const INTERVAL: u64 = 2500;

    /// 收集端把通道里所有待收消息入库
    fn drain_into_storage(
        radio: &mut SimRadio,
        storage: &mut CircularBuffer,
        now_ms: u64,
    ) -> usize {
        let mut stored = 0;
        loop {
            let mut buffer = [0u8; MAX_MESSAGE_SIZE];
            let message = match radio.receive(&mut buffer) {
                Ok(Some(message)) => message,
                _ => return stored,
            };

            let quantity = match message.header.message_type() {
                Some(MessageType::Temperature) => Quantity::Temperature,
                Some(MessageType::Humidity) => Quantity::Humidity,
                _ => continue,
            };
            let value = match decode_scalar(message.payload) {
                Some(value) => value,
                None => continue,
            };

            storage.add_reading(message.header.source_id(), quantity, value, now_ms);
            stored += 1;
        }
    }

    #[test]
    fn test_report_cycle_end_to_end() {
        let channel = SimChannel::new();
        let node_id = NodeId::new([0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6]);
        let collector_id = NodeId::new([0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6]);

        let mut node_radio = SimRadio::new(channel.clone(), node_id);
        let mut collector_radio = SimRadio::new(channel, collector_id);
        let mut storage = CircularBuffer::new();

        let mut sensor = ScriptedDht::new();
        sensor.push_reading(20.0, 50.0);
        sensor.push_reading(21.5, 50.2);

        let mut module = HumidityTemperatureModule::new(sensor, collector_id);
        module.init().unwrap();

        // 第一周期：相对零基准两个量都越界，全部上报
        assert!(module.should_send(INTERVAL));
        module.send_data(&mut node_radio, INTERVAL, false);
        assert_eq!(drain_into_storage(&mut collector_radio, &mut storage, INTERVAL), 2);

        // 第二周期：只有温度越界(1.5 > 1.0)，湿度0.2 ≤ 1.0不上报
        assert!(module.should_send(2 * INTERVAL));
        assert_eq!(module.pending(), (true, false));
        module.send_data(&mut node_radio, 2 * INTERVAL, false);
        assert_eq!(
            drain_into_storage(&mut collector_radio, &mut storage, 2 * INTERVAL),
            1
        );

        // 收集端看到的读数序列
        let records = storage.records_for_node(node_id);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].value, 20.0);
        assert_eq!(records[1].value, 50.0);
        assert_eq!(records[2].quantity, Quantity::Temperature);
        assert_eq!(records[2].value, 21.5);

        // 节点侧基准：温度锚定到21.5，湿度保持50.0
        assert_eq!(module.last_sent(), (21.5, 50.0));
    }

    #[test]
    fn test_gate_suppresses_between_intervals() {
        let channel = SimChannel::new();
        let node_id = NodeId::new([0x01; 6]);
        let collector_id = NodeId::new([0x02; 6]);

        let mut node_radio = SimRadio::new(channel.clone(), node_id);
        let mut collector_radio = SimRadio::new(channel, collector_id);

        let mut sensor = ScriptedDht::new();
        sensor.push_reading(20.0, 50.0);
        sensor.push_reading(99.0, 99.0);

        let mut module = HumidityTemperatureModule::new(sensor, collector_id);
        module.init().unwrap();

        assert!(module.should_send(INTERVAL));
        module.send_data(&mut node_radio, INTERVAL, false);

        // 间隔未到：不采样也不发送，物理值再极端也一样
        for now in [INTERVAL + 100, INTERVAL + 1000, INTERVAL + 2499] {
            assert!(!module.should_send(now));
        }

        // 间隔内收集端只看到第一周期的两条上报
        let mut storage = CircularBuffer::new();
        drain_into_storage(&mut collector_radio, &mut storage, INTERVAL + 2499);
        assert_eq!(storage.record_count(), 2);
    }

    #[test]
    fn test_forced_send_reports_both_quantities() {
        let channel = SimChannel::new();
        let node_id = NodeId::new([0x01; 6]);
        let collector_id = NodeId::new([0x02; 6]);

        let mut node_radio = SimRadio::new(channel.clone(), node_id);
        let mut collector_radio = SimRadio::new(channel, collector_id);
        let mut storage = CircularBuffer::new();

        let mut sensor = ScriptedDht::new();
        sensor.push_reading(22.5, 61.0);

        let mut module = HumidityTemperatureModule::with_config(
            sensor,
            collector_id,
            ThresholdPair::default(),
            INTERVAL,
            common::protocol::ThresholdCodec::Binary,
        );
        module.init().unwrap();

        // 没有任何标志的情况下强制发送：先采样，然后两个量都发
        module.send_data(&mut node_radio, INTERVAL, true);
        assert_eq!(drain_into_storage(&mut collector_radio, &mut storage, INTERVAL), 2);

        let records = storage.records_for_node(node_id);
        assert_eq!(records[0].value, 22.5);
        assert_eq!(records[1].value, 61.0);
    }
}
