use huffcompressor::{codec,CodeTable,FrequencyTable,HuffmanTree};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_roundtrip(input in prop::collection::vec(any::<u8>(), 1..500)) {
        let freq = FrequencyTable::analyze(input.iter().copied());
        let tree = HuffmanTree::build(&freq).unwrap();
        let codes = CodeTable::from_tree(&tree);
        let encoded = codec::encode(input.iter().copied(),&codes).unwrap();
        prop_assert_eq!(codec::decode(&tree,&encoded).unwrap(),input);
    }

    #[test]
    fn test_prefix_free(input in prop::collection::vec(0..20u8, 1..300)) {
        let freq = FrequencyTable::analyze(input.iter().copied());
        let tree = HuffmanTree::build(&freq).unwrap();
        let codes = CodeTable::from_tree(&tree);
        let all: Vec<String> = codes.iter().map(|(s,_)| codes.code_string(&s).unwrap()).collect();
        for (i,a) in all.iter().enumerate() {
            for (j,b) in all.iter().enumerate() {
                prop_assert!(i == j || !b.starts_with(a.as_str()));
            }
        }
    }

    #[test]
    fn test_tree_shape(input in prop::collection::vec(any::<char>(), 1..300)) {
        let freq = FrequencyTable::analyze(input.iter().copied());
        let tree = HuffmanTree::build(&freq).unwrap();
        prop_assert_eq!(tree.leaf_count(),freq.len());
        prop_assert_eq!(tree.branch_count(),freq.len() - 1);
        prop_assert_eq!(tree.frequency(),input.len() as u64);
        // encoded length is exactly the weighted path length, except for one symbol
        let codes = CodeTable::from_tree(&tree);
        let encoded = codec::encode(input.iter().copied(),&codes).unwrap();
        if tree.is_degenerate() {
            prop_assert_eq!(encoded.bit_len(),input.len());
        } else {
            prop_assert_eq!(encoded.bit_len() as u64,tree.weighted_path_length());
        }
    }

    #[test]
    fn test_no_worse_than_fixed_width(input in prop::collection::vec(0..16u8, 2..300)) {
        // 16 symbols fit in 4 bits, an optimal code never does worse
        let freq = FrequencyTable::analyze(input.iter().copied());
        let tree = HuffmanTree::build(&freq).unwrap();
        prop_assert!(tree.weighted_path_length() <= 4 * input.len() as u64);
    }
}
