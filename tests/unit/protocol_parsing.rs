#[cfg(test)]
mod protocol_parsing_tests {
    use common::protocol::threshold::{THRESHOLD_BINARY_LEN, THRESHOLD_TEXT_LEN};
    use common::protocol::{
        decode_scalar, encode_scalar, MeshMessage, MessageType, NodeId, ThresholdCodec,
        ThresholdPair, MAX_MESSAGE_SIZE,
    };
    use common::utils::calculate_checksum;

    #[test]
    fn test_reading_message_creation_and_parsing() {
        let source = NodeId::new([0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        let destination = NodeId::new([0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6]);
        let payload = encode_scalar(21.5);

        // 创建温度读数消息
        let message = MeshMessage::new(source, destination, MessageType::Temperature, &payload);

        // 验证消息字段
        assert_eq!(message.header.message_type(), Some(MessageType::Temperature));
        assert_eq!(message.header.source, source.0);
        assert_eq!(message.header.destination, destination.0);
        assert_eq!(message.header.payload_length as usize, payload.len());

        // 验证校验和计算是否正确
        assert!(message.is_valid());

        // 序列化后再解析，读数不变
        let mut buffer = [0u8; MAX_MESSAGE_SIZE];
        let written = message.write_to(&mut buffer).unwrap();
        let parsed = MeshMessage::parse(&buffer[..written]).unwrap();
        assert_eq!(decode_scalar(parsed.payload), Some(21.5));
    }

    #[test]
    fn test_corrupted_frame_detected() {
        let source = NodeId::new([0x01; 6]);
        let payload = encode_scalar(50.0);
        let message = MeshMessage::new(source, NodeId::BROADCAST, MessageType::Humidity, &payload);

        let mut buffer = [0u8; MAX_MESSAGE_SIZE];
        let written = message.write_to(&mut buffer).unwrap();

        // 翻转负载中的一个位，校验和必须不再有效
        buffer[written - 1] ^= 0x01;
        let parsed = MeshMessage::parse(&buffer[..written]).unwrap();
        assert!(!parsed.is_valid());

        // 手动校验和与头部字段无关的拼接结果不同
        let checksum = calculate_checksum(&buffer[..written]);
        let header_checksum = parsed.header.checksum;
        assert_ne!(checksum, header_checksum);
    }

    #[test]
    fn test_node_id_functions() {
        let node_id = NodeId::new([0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        let broadcast_id = NodeId::BROADCAST;

        // 验证广播ID
        assert!(broadcast_id.is_broadcast());
        assert!(!node_id.is_broadcast());

        // 验证相等性
        let same_id = NodeId::new([0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        let different_id = NodeId::new([0x01, 0x02, 0x03, 0x04, 0x05, 0x07]);

        assert_eq!(node_id, same_id);
        assert_ne!(node_id, different_id);
    }

    #[test]
    fn test_threshold_binary_round_trip_exact() {
        let pair = ThresholdPair::new(3.2, 1.7);
        let mut buffer = [0u8; THRESHOLD_BINARY_LEN];
        pair.encode(ThresholdCodec::Binary, &mut buffer).unwrap();

        let (temperature, humidity) = ThresholdPair::decode(&buffer);
        assert_eq!(temperature, Some(3.2));
        assert_eq!(humidity, Some(1.7));
    }

    #[test]
    fn test_threshold_legacy_round_trip_truncated() {
        // 文本编码截断到一位小数：3.2→3.2，1.75→1.7
        let pair = ThresholdPair::new(3.2, 1.75);
        let mut buffer = [0u8; THRESHOLD_TEXT_LEN];
        pair.encode(ThresholdCodec::LegacyText, &mut buffer).unwrap();

        let (temperature, humidity) = ThresholdPair::decode(&buffer);
        assert_eq!(temperature, Some(3.2));
        assert_eq!(humidity, Some(1.7));
    }

    /// 旧固件发来的定长21字节文本帧
    fn legacy_frame(text: &str) -> [u8; THRESHOLD_TEXT_LEN] {
        let mut frame = [0u8; THRESHOLD_TEXT_LEN];
        frame[..text.len()].copy_from_slice(text.as_bytes());
        frame
    }

    #[test]
    fn test_threshold_update_validation() {
        // 解码词元("5.0", "-1.0")：温度改为5.0，湿度保持不变
        let (temperature, humidity) = ThresholdPair::decode(&legacy_frame("5.0\n-1.0"));
        assert_eq!(temperature, Some(5.0));
        assert_eq!(humidity, Some(-1.0));

        let mut pair = ThresholdPair::default();
        pair.apply(temperature, humidity);
        assert_eq!(pair.temperature, 5.0);
        assert_eq!(pair.humidity, 1.0);
    }
}
