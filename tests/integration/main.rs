mod eligibility_flow;
mod mock_store;
