mod test_tree;
